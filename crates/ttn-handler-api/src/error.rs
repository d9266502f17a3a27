use thiserror::Error;
use tonic::Code;

/// Top-level error type for the `ttn-handler-api` crate.
///
/// Grouped by origin: transport (the channel could not be built or the
/// connection failed), remote (the handler answered with a non-OK status),
/// and data (a response could not be normalized). Errors are never
/// translated or retried on the way to the caller.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// gRPC transport error (connection refused, h2 failure, etc.)
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The announced network address is not a valid endpoint URI.
    #[error("Invalid handler address {address:?}: {message}")]
    InvalidAddress { address: String, message: String },

    /// TLS configuration error (unusable certificate, missing roots).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// The handler (or the transport on its behalf) returned a non-OK status.
    #[error("RPC failed ({}): {}", .0.code(), .0.message())]
    Rpc(Box<tonic::Status>),

    // ── Data ────────────────────────────────────────────────────────
    /// A response message could not be turned into a plain record.
    #[error("Failed to decode {field}: {message}")]
    Decode {
        field: &'static str,
        message: String,
    },

    // ── Local ───────────────────────────────────────────────────────
    /// The access key cannot be carried as gRPC metadata.
    #[error("Invalid access key: {0}")]
    InvalidAccessKey(String),

    /// Operation declared by the client but not backed by a known RPC contract.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Self::Rpc(Box::new(status))
    }
}

impl Error {
    /// The gRPC status code, if this error came back from a call.
    pub fn status_code(&self) -> Option<Code> {
        match self {
            Self::Rpc(status) => Some(status.code()),
            _ => None,
        }
    }

    /// Returns `true` if the handler does not know the application.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(Code::NotFound)
    }

    /// Returns `true` if the access key was rejected.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self.status_code(),
            Some(Code::PermissionDenied | Code::Unauthenticated)
        )
    }

    /// Returns `true` if this is a transient error a caller might retry.
    ///
    /// Classification only: the client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rpc(status) => matches!(
                status.code(),
                Code::Unavailable | Code::DeadlineExceeded | Code::ResourceExhausted
            ),
            _ => false,
        }
    }
}
