//! Error types for the sync engine and transport adapter.

use thiserror::Error;

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors a transport upsert can report.
///
/// Transport errors are always recovered locally: the engine records them
/// in the sync log and leaves the entity dirty. They never propagate out of
/// a sync pass.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The remote system could not be reached at all.
    #[error("network unreachable: {0}")]
    Unreachable(String),

    /// The request did not resolve within the transport's time bound.
    #[error("request timed out after {millis} ms")]
    Timeout {
        /// How long the transport waited.
        millis: u64,
    },

    /// The server answered with a failure status.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP-style status code.
        status: u16,
        /// Server-provided detail.
        message: String,
    },

    /// The server understood the request but refused the entity.
    #[error("entity rejected: {0}")]
    Rejected(String),

    /// The request or response could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Creates an unreachable-network error.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    /// Creates a server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Returns true if a later pass could plausibly succeed without any
    /// local change.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout { .. } => true,
            Self::Server { status, .. } => *status >= 500,
            Self::Rejected(_) | Self::Protocol(_) => false,
        }
    }
}

/// Errors that can abort a sync pass as a whole.
///
/// Transport failures are not represented here by construction; the only
/// way a pass fails is the local store failing to persist an outcome.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local store could not persist a sync outcome.
    #[error("store error: {0}")]
    Store(#[from] shule_core::CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(TransportError::unreachable("no route").is_retryable());
        assert!(TransportError::Timeout { millis: 1500 }.is_retryable());
        assert!(TransportError::server(503, "unavailable").is_retryable());
        assert!(!TransportError::server(422, "bad payload").is_retryable());
        assert!(!TransportError::Rejected("duplicate".into()).is_retryable());
        assert!(!TransportError::Protocol("bad json".into()).is_retryable());
    }

    #[test]
    fn error_display() {
        let err = TransportError::Timeout { millis: 800 };
        assert_eq!(err.to_string(), "request timed out after 800 ms");

        let err = TransportError::server(500, "boom");
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }
}
