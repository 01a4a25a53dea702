//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use onosdash_config::ConfigError;
use onosdash_core::{ApiError, CoreError, ErrorKind};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}: {reason}")]
    #[diagnostic(
        code(onosdash::connection_failed),
        help(
            "Check that ONOS is running and its REST API is reachable.\n\
             URL: {url}\n\
             Try: onosdash test --controller-ip <host> --controller-port 8181"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Connection test against {endpoint} failed: {message}")]
    #[diagnostic(code(onosdash::connection_test))]
    ConnectionTest {
        endpoint: String,
        message: String,
        kind: Option<ErrorKind>,
        status: Option<u16>,
        #[help]
        suggestions: Option<String>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Controller rejected the credentials (HTTP {status})")]
    #[diagnostic(
        code(onosdash::auth_failed),
        help(
            "ONOS ships with username 'onos' and password 'rocks'.\n\
             Update them with: onosdash config set username <name>\n\
             or pass --username / --password for a single run."
        )
    )]
    AuthFailed { status: u16 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(onosdash::not_found),
        help("Run: onosdash {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(onosdash::api_error))]
    ApiError { status: u16, message: String },

    #[error("Controller returned a malformed response: {message}")]
    #[diagnostic(
        code(onosdash::malformed_response),
        help("Is something other than ONOS (e.g. a proxy login page) answering on this port?")
    )]
    MalformedResponse { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {millis}ms")]
    #[diagnostic(
        code(onosdash::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { millis: u128 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(onosdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in settings")]
    #[diagnostic(
        code(onosdash::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: onosdash config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(
        code(onosdash::config),
        help("Inspect the settings file with: onosdash config show")
    )]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(onosdash::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::ConnectionTest { kind, status, .. } => match (kind, status) {
                (_, Some(401 | 403)) => exit_code::AUTH,
                (_, Some(404)) => exit_code::NOT_FOUND,
                (Some(ErrorKind::Timeout), _) => exit_code::TIMEOUT,
                (Some(ErrorKind::Configuration), _) => exit_code::USAGE,
                (Some(ErrorKind::Connectivity), _) => exit_code::CONNECTION,
                _ => exit_code::GENERAL,
            },
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::ApiError { .. }
            | Self::MalformedResponse { .. }
            | Self::Io(_)
            | Self::Serialize(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_ms } => Self::Timeout { millis: timeout_ms },
            CoreError::AuthenticationFailed { status } => Self::AuthFailed { status },
            CoreError::NotFound { message } => Self::NotFound {
                resource_type: "resource".into(),
                identifier: message,
                list_command: "--help".into(),
            },
            CoreError::MalformedResponse { message } => Self::MalformedResponse { message },
            CoreError::Api { status, message } => Self::ApiError { status, message },
            CoreError::Config { message } => Self::Validation {
                field: "controller".into(),
                reason: message,
            },
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::UnknownKey { key, valid } => Self::Validation {
                field: key,
                reason: format!("unknown setting; valid keys: {valid}"),
            },
            other => Self::Config(other),
        }
    }
}
