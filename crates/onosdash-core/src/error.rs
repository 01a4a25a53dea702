// ── Core error types ──
//
// User-facing errors from onosdash-core. The `From<onosdash_api::Error>`
// impl translates transport-layer failures into domain-level variants
// while keeping the closed `ErrorKind` available for branching.

use thiserror::Error;

use onosdash_api::ErrorKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u128 },

    #[error("Controller rejected the credentials (HTTP {status})")]
    AuthenticationFailed { status: u16 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found on controller: {message}")]
    NotFound { message: String },

    #[error("Controller returned a malformed response: {message}")]
    MalformedResponse { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The transport-level category this error originated from.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } => ErrorKind::Connectivity,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::AuthenticationFailed { .. } | Self::NotFound { .. } | Self::Api { .. } => {
                ErrorKind::HttpStatus
            }
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Config { .. } => ErrorKind::Configuration,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<onosdash_api::Error> for CoreError {
    fn from(err: onosdash_api::Error) -> Self {
        use onosdash_api::Error as Api;

        match err {
            Api::Timeout { timeout } => Self::Timeout {
                timeout_ms: timeout.as_millis(),
            },
            Api::Connectivity { url, message } => Self::ConnectionFailed {
                url,
                reason: message,
            },
            Api::HttpStatus {
                status: status @ (401 | 403),
                ..
            } => Self::AuthenticationFailed { status },
            Api::HttpStatus { status: 404, reason } => Self::NotFound { message: reason },
            Api::HttpStatus { status, reason } => Self::Api {
                status,
                message: reason,
            },
            Api::MalformedResponse { message, body: _ } => Self::MalformedResponse { message },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid controller URL: {e}"),
            },
            Api::ClientBuild(message) => Self::Config { message },
        }
    }
}
