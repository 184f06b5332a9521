//! Completion client for an OpenAI-compatible provider.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::completer::Completer;
use crate::config::CompletionConfig;
use crate::error::CompletionError;

/// A [`Completer`] backed by a hosted chat-completion API.
///
/// Holds one HTTP client for the life of the process. Each request is a
/// single attempt with reqwest's default timeouts.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder().build().map_err(|e| {
            CompletionError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(
            "Completion client initialized with model: {}, endpoint: {}",
            config.model,
            config.completions_url()
        );

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`CompletionConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, CompletionError> {
        let config = CompletionConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Build the two-message prompt for a user message.
    pub fn build_messages(&self, user_text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.config.system_prompt.clone()),
            ChatMessage::user(user_text),
        ]
    }

    /// Make a chat completion request to the provider.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
        };

        debug!("Sending completion request: {:?}", request);

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => {
                    warn!(
                        status = status.as_u16(),
                        error_type = api_error.error.error_type.as_deref().unwrap_or("unknown"),
                        "Provider rejected completion request"
                    );
                    api_error.error.message
                }
                Err(_) => error_text,
            };

            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        debug!("Received completion response: {:?}", completion);

        Ok(completion)
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(&self, user_text: &str) -> Result<String, CompletionError> {
        let messages = self.build_messages(user_text);
        let completion = self.chat_completion(messages).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        if let Some(reason) = completion
            .choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
        {
            debug!(
                id = completion.id.as_deref().unwrap_or("-"),
                model = completion.model.as_deref().unwrap_or("-"),
                finish_reason = reason,
                "Completion finished"
            );
        }

        completion
            .first_content()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "CompletionClient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CompletionClient {
        let config = CompletionConfig::builder()
            .api_key("test-key")
            .api_url(server.uri())
            .build();
        CompletionClient::new(config).unwrap()
    }

    #[test]
    fn test_build_messages_is_system_then_user() {
        let client = CompletionClient::new(CompletionConfig::default()).unwrap();
        let messages = client.build_messages("Hello");
        assert_eq!(
            messages,
            vec![
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("Hello"),
            ]
        );
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "model": "deepseek-chat",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "model": "deepseek-chat",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hi there"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).complete("Hello").await.unwrap();
        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Authentication Fails", "type": "authentication_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).complete("Hello").await.unwrap_err();
        match err {
            CompletionError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication Fails");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("Hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::Api { status: 503, ref message } if message == "overloaded"));
    }

    #[tokio::test]
    async fn test_missing_content_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("Hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("Hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_error() {
        let config = CompletionConfig::builder()
            .api_key("k")
            .api_url("http://127.0.0.1:1")
            .build();
        let client = CompletionClient::new(config).unwrap();

        let err = client.complete("Hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::Network(_)));
    }
}
