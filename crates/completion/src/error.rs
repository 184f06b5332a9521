//! Error types for completion requests.

use thiserror::Error;

/// Errors that can occur while obtaining a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's body could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The first choice carried no text.
    #[error("response contained no content")]
    EmptyResponse,
}
