use core::result::Result as CoreResult;
use std::io::Error as IoError;

use serde_json::Error as SerdeJsonError;
use thiserror::Error as ThisError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, ThisError)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// A capability provider is temporarily unreachable.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A capability provider rejected the requested action.
    #[error("Unsupported action '{action}' for provider '{provider}'")]
    UnsupportedAction {
        /// Provider that rejected the action.
        provider: String,
        /// Action name that was not recognized.
        action: String,
    },

    /// A message source could not satisfy a load request.
    #[error("Message source error: {0}")]
    MessageSource(String),

    /// Required parameters were missing or malformed.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error may succeed if retried.
    ///
    /// Returns `true` for transient failures such as an unreachable provider.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::MessageSource(_))
    }
}
