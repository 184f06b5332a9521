//! Route handlers for the chat web interface.

pub mod health;
pub mod store;
pub mod ui;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::gateway;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML page and HTMX fragments
        .route("/", get(ui::chat_page))
        .route("/ui/app", get(ui::app_fragment))
        .route("/ui/chat", get(ui::chat_panel))
        .route("/ui/chats", post(ui::create_chat))
        .route("/ui/chats/:id/select", post(ui::select_chat))
        .route("/ui/chats/:id/edit", post(ui::start_editing))
        .route("/ui/rename", post(ui::save_title))
        .route("/ui/send", post(ui::send_message))
        // Health check
        .route("/health", get(health::health))
        // Completion gateway
        .route("/api/chat", post(gateway::chat))
        // Conversation store
        .route("/api/chats", get(store::list_chats).post(store::create_chat))
        .route("/api/chats/:id", patch(store::rename_chat))
        .route(
            "/api/chats/:id/messages",
            get(store::list_messages).post(store::append_messages),
        )
}
