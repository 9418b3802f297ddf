use thiserror::Error;

/// Unified error type for the crate.
///
/// Aggregates configuration, transport, and remote-service failures into
/// actionable categories. Per-batch classification failures travel inside
/// [`crate::dispatch::BatchOutcome`] as values of this type and never abort
/// a dispatch run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Remote error: HTTP {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        retryable: bool,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Retry policy itself is the caller's concern; this flag only records
    /// how the failure was classified.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Remote { retryable, .. } => *retryable,
            Error::Transport(_) => true,
            _ => false,
        }
    }
}
