//! Conversation store JSON API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{chat, message, Chat, Turn, DEFAULT_CHAT_TITLE};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Request to create a conversation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request to rename a conversation.
#[derive(Debug, Deserialize)]
pub struct RenameChatRequest {
    pub title: String,
}

/// Request to append one exchange.
#[derive(Debug, Deserialize)]
pub struct AppendMessagesRequest {
    pub user: String,
    pub assistant: String,
}

/// List all conversations.
pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<Chat>>> {
    let chats = chat::list_chats(state.db.pool()).await?;
    Ok(Json(chats))
}

/// Create a conversation, titled "New Chat" unless a title is given.
pub async fn create_chat(
    State(state): State<AppState>,
    body: Option<Json<CreateChatRequest>>,
) -> Result<(StatusCode, Json<Chat>)> {
    let title = body
        .and_then(|Json(req)| req.title)
        .unwrap_or_else(|| DEFAULT_CHAT_TITLE.to_string());

    let created = chat::create_chat(state.db.pool(), &title).await?;
    info!(chat_id = created.id, "Conversation created via API");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename a conversation.
pub async fn rename_chat(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<RenameChatRequest>,
) -> Result<Json<Chat>> {
    let pool = state.db.pool();
    chat::rename_chat(pool, id, &req.title).await?;
    Ok(Json(chat::get_chat(pool, id).await?))
}

/// A conversation's turns, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Turn>>> {
    let pool = state.db.pool();
    chat::get_chat(pool, id).await?;
    Ok(Json(message::list_turns(pool, id).await?))
}

/// Append a user turn and its assistant reply.
pub async fn append_messages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AppendMessagesRequest>,
) -> Result<StatusCode> {
    let pool = state.db.pool();
    chat::get_chat(pool, id).await?;
    message::append_message_pair(pool, id, &req.user, &req.assistant).await?;
    Ok(StatusCode::CREATED)
}
