//! Chat-completion provider client.
//!
//! This crate forwards a single user message to an OpenAI-compatible
//! chat-completion API (DeepSeek by default) and returns the reply text.
//!
//! # Features
//!
//! - Two-message prompt: a fixed system instruction plus the user text
//! - No conversation history is sent; every call is context-free
//! - Default sampling parameters (nothing but model and messages is sent)
//! - Configurable via environment variables
//! - [`Completer`] trait so callers can swap in mocks
//!
//! # Usage
//!
//! ```rust,no_run
//! use completion::{CompletionClient, Completer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CompletionClient::from_env()?;
//!     let reply = client.complete("Hello").await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod client;
mod completer;
mod config;
mod error;
pub mod mock;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use client::CompletionClient;
pub use completer::Completer;
pub use config::{CompletionConfig, CompletionConfigBuilder, DEFAULT_SYSTEM_PROMPT};
pub use error::CompletionError;

// Re-export async_trait for implementors
pub use async_trait::async_trait;
