//! Client side of the completion gateway, as seen by the chat controller.

use std::sync::Arc;

use async_trait::async_trait;
use completion::{Completer, CompletionError};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::gateway::{ChatRequest, ChatResponse};

/// Errors returned to the controller by a gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The gateway answered with a non-success status.
    #[error("gateway returned status {0}")]
    Status(u16),

    /// The gateway's body was not a `{message}` object.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    /// The in-process provider call failed.
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
}

/// Sends one user message and returns the assistant reply.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, GatewayError>;
}

/// Calls a gateway over HTTP, the way the browser client does.
///
/// Any non-2xx status is a failure; the error body is ignored.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    /// Create a gateway client for a server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL of the chat endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, message: &str) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        debug!(endpoint = %self.endpoint, "Gateway replied");
        Ok(body.message)
    }
}

/// Answers in-process with the same completer the `/api/chat` route uses.
pub struct LocalGateway {
    completer: Arc<dyn Completer>,
}

impl LocalGateway {
    pub fn new(completer: Arc<dyn Completer>) -> Self {
        Self { completer }
    }
}

#[async_trait]
impl Gateway for LocalGateway {
    async fn send(&self, message: &str) -> Result<String, GatewayError> {
        Ok(self.completer.complete(message).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use completion::mock::{EchoCompleter, FailingCompleter};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_joins_base_url() {
        let gateway = HttpGateway::new("http://localhost:3000/").unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:3000/api/chat");
    }

    #[tokio::test]
    async fn test_http_gateway_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({"message": "Hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Hi there"})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(&server.uri()).unwrap();
        assert_eq!(gateway.send("Hello").await.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn test_http_gateway_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"message": "An error occurred while processing your request."})),
            )
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(&server.uri()).unwrap();
        assert!(matches!(gateway.send("Hello").await, Err(GatewayError::Status(500))));
    }

    #[tokio::test]
    async fn test_http_gateway_bad_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(&server.uri()).unwrap();
        assert!(matches!(
            gateway.send("Hello").await,
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_local_gateway() {
        let gateway = LocalGateway::new(Arc::new(EchoCompleter::with_prefix("re: ")));
        assert_eq!(gateway.send("ping").await.unwrap(), "re: ping");

        let gateway = LocalGateway::new(Arc::new(FailingCompleter));
        assert!(matches!(
            gateway.send("ping").await,
            Err(GatewayError::Completion(CompletionError::Network(_)))
        ));
    }
}
