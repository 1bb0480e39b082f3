//! Error types for all GemmaTalk crates.

use std::time::Duration;

/// The fixed message shown to the user when a chat turn fails.
pub const BACKEND_ERROR_MESSAGE: &str = "⚠️ Error connecting to backend.";

/// Errors from a chat turn or a backend call.
///
/// All of these are scoped to one request; none is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    // Transport errors
    /// Connection-level failure (refused, reset, DNS, read error).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The backend answered without a body to stream.
    #[error("response has no body")]
    MissingBody,

    // Protocol errors
    /// A JSON body the client expected could not be parsed.
    #[error("decode error: {0}")]
    Decode(String),
    /// No data arrived within the idle window.
    #[error("no data received for {0:?}")]
    ProtocolTimeout(Duration),

    /// The caller abandoned the turn.
    #[error("cancelled")]
    Cancelled,
}

impl ChatError {
    /// Whether this error belongs to the transport family (network,
    /// non-2xx status, missing body).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http { .. } | Self::MissingBody
        )
    }

    /// Whether a caller could reasonably retry. Nothing in GemmaTalk retries
    /// on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::ProtocolTimeout(_) => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            Self::MissingBody | Self::Decode(_) | Self::Cancelled => false,
        }
    }

    /// The message to show the user for this error.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        BACKEND_ERROR_MESSAGE
    }
}

/// Errors from persisted-state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A read failed for a reason other than the key being absent.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// A write operation failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
