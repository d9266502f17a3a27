//! CLI error types with miette diagnostics.
//!
//! Maps `ttn_handler_api::Error` and `ConfigError` into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;
use ttn_handler_api::Error as ApiError;
use ttn_handler_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach handler at {address}")]
    #[diagnostic(
        code(ttn_handler::connection_failed),
        help(
            "Check that the handler is running and reachable.\n\
             Address: {address}"
        )
    )]
    ConnectionFailed {
        address: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid handler address {address:?}")]
    #[diagnostic(
        code(ttn_handler::invalid_address),
        help("Use host:port, e.g. eu.thethings.network:1904. {reason}")
    )]
    InvalidAddress { address: String, reason: String },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(ttn_handler::tls_error),
        help(
            "Check the announced certificate (--certificate or certificate_path).\n\
             Handlers announced without a certificate use an insecure channel."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Access denied for application '{app_id}'")]
    #[diagnostic(
        code(ttn_handler::auth_failed),
        help(
            "Verify the application access key and its rights.\n\
             Run: ttn-handler config set-key --profile {profile}"
        )
    )]
    AuthFailed { app_id: String, profile: String },

    #[error("No access key configured for profile '{profile}'")]
    #[diagnostic(
        code(ttn_handler::no_credentials),
        help(
            "Store one with: ttn-handler config set-key\n\
             Or set the TTN_ACCESS_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Application '{app_id}' not found on the handler")]
    #[diagnostic(code(ttn_handler::not_found))]
    NotFound { app_id: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Handler error ({code}): {message}")]
    #[diagnostic(code(ttn_handler::api_error))]
    ApiError { code: String, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(code(ttn_handler::decode))]
    Decode { message: String },

    #[error("Operation '{operation}' is not supported")]
    #[diagnostic(code(ttn_handler::unsupported))]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ttn_handler::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ttn_handler::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No handler configured")]
    #[diagnostic(
        code(ttn_handler::no_config),
        help(
            "Pass --app-id and --address, or add a profile to the config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ttn_handler::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } | Self::InvalidAddress { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach application/handler context to a client error.
    pub fn from_api(err: ApiError, app_id: &str, address: &str, profile: &str) -> Self {
        match err {
            ApiError::Transport(source) => Self::ConnectionFailed {
                address: address.into(),
                source: Box::new(source),
            },
            ApiError::InvalidAddress { address, message } => Self::InvalidAddress {
                address,
                reason: message,
            },
            ApiError::Tls(message) => Self::TlsError { message },
            err if err.is_not_found() => Self::NotFound {
                app_id: app_id.into(),
            },
            err if err.is_permission_denied() => Self::AuthFailed {
                app_id: app_id.into(),
                profile: profile.into(),
            },
            err if err.is_transient() => Self::ConnectionFailed {
                address: address.into(),
                source: Box::new(err),
            },
            ApiError::Rpc(status) => Self::ApiError {
                code: status.code().to_string(),
                message: status.message().to_owned(),
            },
            ApiError::Decode { field, message } => Self::Decode {
                message: format!("{field}: {message}"),
            },
            ApiError::InvalidAccessKey(reason) => Self::Validation {
                field: "access key".into(),
                reason,
            },
            ApiError::UnsupportedOperation(operation) => Self::Unsupported {
                operation: operation.into(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
