//! Configuration for the completion client.

use std::env;

use crate::error::CompletionError;

/// System instruction sent ahead of every user message.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default provider base URL.
const DEFAULT_API_URL: &str = "https://api.deepseek.com";

/// Default model identifier.
const DEFAULT_MODEL: &str = "deepseek-chat";

/// Configuration for [`CompletionClient`](crate::CompletionClient).
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Provider base URL; `/chat/completions` is appended.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// System instruction placed before the user message.
    pub system_prompt: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl CompletionConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DEEPSEEK_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `DEEPSEEK_API_URL` - API base URL (default: https://api.deepseek.com)
    /// - `DEEPSEEK_MODEL` - Model name (default: deepseek-chat)
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CompletionError::Configuration("DEEPSEEK_API_KEY not set".to_string()))?;

        let api_url = env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        })
    }

    /// Create a new config builder.
    pub fn builder() -> CompletionConfigBuilder {
        CompletionConfigBuilder::default()
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for CompletionConfig.
#[derive(Debug, Default)]
pub struct CompletionConfigBuilder {
    config: CompletionConfig,
}

impl CompletionConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CompletionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompletionConfig::default();

        assert_eq!(config.api_url, "https://api.deepseek.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.system_prompt, "You are a helpful assistant.");
    }

    #[test]
    fn test_builder_all_options() {
        let config = CompletionConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("deepseek-reasoner")
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_completions_url() {
        let config = CompletionConfig::builder().api_url("http://localhost:9000/").build();
        assert_eq!(config.completions_url(), "http://localhost:9000/chat/completions");

        let config = CompletionConfig::default();
        assert_eq!(config.completions_url(), "https://api.deepseek.com/chat/completions");
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            std::env::remove_var("DEEPSEEK_API_KEY");
            std::env::remove_var("DEEPSEEK_API_URL");
            std::env::remove_var("DEEPSEEK_MODEL");
        }

        // Missing API key should error
        clear_all_vars();
        match CompletionConfig::from_env() {
            Err(CompletionError::Configuration(msg)) => assert!(msg.contains("DEEPSEEK_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Blank API key is treated as missing
        std::env::set_var("DEEPSEEK_API_KEY", "  ");
        assert!(CompletionConfig::from_env().is_err());

        // Only API key set, defaults used
        clear_all_vars();
        std::env::set_var("DEEPSEEK_API_KEY", "test-env-key");
        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://api.deepseek.com");
        assert_eq!(config.model, "deepseek-chat");

        // All vars set
        std::env::set_var("DEEPSEEK_API_URL", "https://test.api.com");
        std::env::set_var("DEEPSEEK_MODEL", "deepseek-reasoner");
        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);

        clear_all_vars();
    }
}
