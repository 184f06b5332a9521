//! Server-rendered chat page and its HTMX fragments.
//!
//! Every action re-renders the `#app` fragment from the controller. While a
//! send is in flight only the chat panel polls `/ui/chat`, so the sidebar and
//! any open title editor are left alone until the reply lands.

use askama::Template;
use axum::extract::{Path, State};
use axum::Form;
use database::Role;
use serde::Deserialize;

use crate::controller::{run_send, ChatController};
use crate::markdown;
use crate::state::AppState;

/// Transcript and composer, polled on their own while a send is in flight.
#[derive(Template)]
#[template(path = "chat_panel.html")]
pub struct ChatPanelTemplate {
    pub view: AppView,
}

/// Full page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct ChatPageTemplate {
    pub view: AppView,
}

/// The swappable application fragment.
#[derive(Template)]
#[template(path = "app.html")]
pub struct AppTemplate {
    pub view: AppView,
}

/// Everything the templates need, copied out of the controller.
#[derive(Debug, Clone)]
pub struct AppView {
    pub chats: Vec<ChatItem>,
    pub turns: Vec<TurnView>,
    pub has_selection: bool,
    pub sending: bool,
}

/// One sidebar entry.
#[derive(Debug, Clone)]
pub struct ChatItem {
    pub id: i64,
    pub title: String,
    pub active: bool,
    pub editing: bool,
}

/// One rendered transcript turn.
#[derive(Debug, Clone)]
pub struct TurnView {
    pub is_user: bool,
    /// Plain text for user turns, rendered markdown for assistant turns.
    pub body: String,
}

impl AppView {
    pub fn from_controller(controller: &ChatController) -> Self {
        let editing = controller.editing();

        let chats = controller
            .chats()
            .iter()
            .map(|chat| {
                let edit = editing.filter(|edit| edit.chat_id == chat.id);
                ChatItem {
                    id: chat.id,
                    title: edit.map_or_else(|| chat.title.clone(), |edit| edit.title.clone()),
                    active: controller.current_chat() == Some(chat.id),
                    editing: edit.is_some(),
                }
            })
            .collect();

        let turns = controller
            .transcript()
            .iter()
            .map(|turn| match turn.role {
                Role::User => TurnView {
                    is_user: true,
                    body: turn.content.clone(),
                },
                Role::Assistant => TurnView {
                    is_user: false,
                    body: markdown::render(&turn.content),
                },
            })
            .collect();

        Self {
            chats,
            turns,
            has_selection: controller.current_chat().is_some(),
            sending: controller.is_sending(),
        }
    }
}

/// Rename form. Carries the chat its editor belongs to.
#[derive(Debug, Deserialize)]
pub struct RenameForm {
    pub chat_id: i64,
    pub title: String,
}

/// Message form.
#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

async fn render(state: &AppState) -> AppTemplate {
    let controller = state.controller.lock().await;
    AppTemplate {
        view: AppView::from_controller(&controller),
    }
}

/// Render the chat page.
pub async fn chat_page(State(state): State<AppState>) -> ChatPageTemplate {
    let controller = state.controller.lock().await;
    ChatPageTemplate {
        view: AppView::from_controller(&controller),
    }
}

/// Re-render the application fragment.
pub async fn app_fragment(State(state): State<AppState>) -> AppTemplate {
    render(&state).await
}

/// Re-render the transcript and composer only.
pub async fn chat_panel(State(state): State<AppState>) -> ChatPanelTemplate {
    let controller = state.controller.lock().await;
    ChatPanelTemplate {
        view: AppView::from_controller(&controller),
    }
}

/// Create a conversation and open its title for editing.
pub async fn create_chat(State(state): State<AppState>) -> AppTemplate {
    state.controller.lock().await.create_conversation().await;
    render(&state).await
}

/// Switch to a conversation.
pub async fn select_chat(State(state): State<AppState>, Path(id): Path<i64>) -> AppTemplate {
    state.controller.lock().await.select_conversation(id).await;
    render(&state).await
}

/// Open a conversation title for editing.
pub async fn start_editing(State(state): State<AppState>, Path(id): Path<i64>) -> AppTemplate {
    state.controller.lock().await.start_editing(id);
    render(&state).await
}

/// Save the edited title (Enter, blur or the Save button).
pub async fn save_title(State(state): State<AppState>, Form(form): Form<RenameForm>) -> AppTemplate {
    state
        .controller
        .lock()
        .await
        .save_title(form.chat_id, form.title)
        .await;
    render(&state).await
}

/// Accept a message and finish the exchange in the background.
///
/// The response shows the optimistic user turn straight away.
pub async fn send_message(State(state): State<AppState>, Form(form): Form<SendForm>) -> AppTemplate {
    let pending = state.controller.lock().await.prepare_send(&form.message);

    if let Some(pending) = pending {
        tokio::spawn(run_send(state.controller.clone(), pending));
    }

    render(&state).await
}
