use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `onosdash-api` crate.
///
/// Every request outcome that is not a parsed 2xx JSON body lands in one
/// of these variants. Callers branch on [`Error::kind`] rather than on
/// message text.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The client-side deadline expired and the request was dropped.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The request never reached the controller, or the connection died
    /// before a response arrived (refused, DNS failure, reset, CORS-style
    /// rejection by an intermediary).
    #[error("Cannot reach controller at {url}: {message}")]
    Connectivity { url: String, message: String },

    // ── Controller responses ────────────────────────────────────────
    /// The controller answered with a non-2xx status.
    #[error("HTTP {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// A 2xx body that is not valid JSON, with the raw body for debugging.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },

    // ── Configuration ───────────────────────────────────────────────
    /// The configured host/port did not produce a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Closed set of failure categories, for branching without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    HttpStatus,
    Connectivity,
    MalformedResponse,
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::Connectivity => "connectivity",
            Self::MalformedResponse => "malformed_response",
            Self::Configuration => "configuration",
        };
        f.write_str(label)
    }
}

impl Error {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Connectivity { .. } => ErrorKind::Connectivity,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::InvalidUrl(_) | Self::ClientBuild(_) => ErrorKind::Configuration,
        }
    }

    /// Returns `true` if the next polling tick may well succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connectivity { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the controller rejected the configured credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 401 | 403, .. })
    }

    /// Returns `true` for a 404 from the controller.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 404, .. })
    }

    /// The HTTP status code, if the controller answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a `reqwest` failure that happened before a status was read.
    pub(crate) fn from_transport(err: &reqwest::Error, url: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout { timeout };
        }
        if err.is_decode() {
            return Self::MalformedResponse {
                message: err.to_string(),
                body: String::new(),
            };
        }
        if err.is_builder() {
            return Self::ClientBuild(err.to_string());
        }
        Self::Connectivity {
            url: url.to_owned(),
            message: describe_transport(err),
        }
    }
}

/// Walk the source chain so "error sending request" carries the actual cause.
fn describe_transport(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_every_variant() {
        let cases = [
            (
                Error::Timeout {
                    timeout: Duration::from_secs(10),
                },
                ErrorKind::Timeout,
            ),
            (
                Error::Connectivity {
                    url: "http://127.0.0.1:8181/onos/v1/devices".into(),
                    message: "connection refused".into(),
                },
                ErrorKind::Connectivity,
            ),
            (
                Error::HttpStatus {
                    status: 401,
                    reason: "Unauthorized".into(),
                },
                ErrorKind::HttpStatus,
            ),
            (
                Error::MalformedResponse {
                    message: "expected value".into(),
                    body: "<html>".into(),
                },
                ErrorKind::MalformedResponse,
            ),
            (Error::ClientBuild("tls".into()), ErrorKind::Configuration),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn auth_and_transient_classification() {
        let unauthorized = Error::HttpStatus {
            status: 401,
            reason: "Unauthorized".into(),
        };
        assert!(unauthorized.is_auth_failure());
        assert!(!unauthorized.is_transient());
        assert_eq!(unauthorized.status(), Some(401));

        let unavailable = Error::HttpStatus {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert!(unavailable.is_transient());
        assert!(!unavailable.is_auth_failure());

        let timeout = Error::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert!(timeout.is_transient());
        assert_eq!(timeout.status(), None);
    }

    #[test]
    fn http_status_display_includes_reason() {
        let err = Error::HttpStatus {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
        assert!(err.is_not_found());
    }
}
