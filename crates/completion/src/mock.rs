//! Mock completers for exercising callers without a provider.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::completer::Completer;
use crate::error::CompletionError;

/// Replies with the user's text, optionally prefixed.
#[derive(Debug, Default)]
pub struct EchoCompleter {
    prefix: Option<String>,
    calls: AtomicUsize,
}

impl EchoCompleter {
    /// Create an EchoCompleter with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an EchoCompleter that prepends `prefix` to every reply.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completer for EchoCompleter {
    async fn complete(&self, user_text: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, user_text),
            None => user_text.to_string(),
        })
    }

    fn name(&self) -> &str {
        "EchoCompleter"
    }
}

/// Always replies with the same text.
#[derive(Debug, Clone)]
pub struct FixedCompleter {
    reply: String,
}

impl FixedCompleter {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl Completer for FixedCompleter {
    async fn complete(&self, _user_text: &str) -> Result<String, CompletionError> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "FixedCompleter"
    }
}

/// Fails every request with a network error.
#[derive(Debug, Clone, Default)]
pub struct FailingCompleter;

#[async_trait]
impl Completer for FailingCompleter {
    async fn complete(&self, _user_text: &str) -> Result<String, CompletionError> {
        Err(CompletionError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "FailingCompleter"
    }
}
