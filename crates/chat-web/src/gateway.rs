//! The completion gateway endpoint: `POST /api/chat`.
//!
//! Forwards one user message to the provider and answers with the reply, or
//! with a generic error message and status 500. The cause of a failure is
//! only logged.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Body returned with every failed gateway call.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Gateway request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Gateway response body, used for both success and failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

/// Handle `POST /api/chat`.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!(error = %rejection.body_text(), "Rejected chat request");
            return failure();
        }
    };

    info!(message = %request.message, "Received message");

    match state.completer.complete(&request.message).await {
        Ok(reply) => {
            debug!(reply = %reply, completer = state.completer.name(), "Completion reply");
            (StatusCode::OK, Json(ChatResponse { message: reply }))
        }
        Err(err) => {
            error!(error = %err, "Completion failed");
            failure()
        }
    }
}

fn failure() -> (StatusCode, Json<ChatResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatResponse {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }),
    )
}
