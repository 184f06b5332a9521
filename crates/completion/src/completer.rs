//! The Completer trait definition.

use async_trait::async_trait;

use crate::error::CompletionError;

/// Turns one user message into one assistant reply.
///
/// This trait is object-safe and can be used as `Arc<dyn Completer>`.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Produce the assistant reply for a single user message.
    ///
    /// No prior turns are supplied; implementations must treat each call
    /// as a fresh conversation.
    async fn complete(&self, user_text: &str) -> Result<String, CompletionError>;

    /// Get a human-readable name for this implementation.
    fn name(&self) -> &str;
}
