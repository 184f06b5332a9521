//! Chat UI controller.
//!
//! Owns the conversation list, the active conversation, its transcript and
//! the title-edit state for one browser session. Store and gateway failures
//! are logged and leave the UI as it was; nothing is retried.
//!
//! Sending is split into phases so the shared controller lock is not held
//! while the gateway works:
//!
//! 1. [`ChatController::prepare_send`] validates the input, appends the user
//!    turn optimistically and enters `Sending`.
//! 2. The gateway call runs without the lock.
//! 3. [`ChatController::complete_send`] appends the assistant turn.
//! 4. [`persist_exchange`] writes both turns to the store.
//! 5. [`ChatController::finish_send`] returns to `Idle`.
//!
//! [`run_send`] drives phases 2-5 against a shared controller.

use std::sync::Arc;

use database::{Chat, ConversationStore, Turn, DEFAULT_CHAT_TITLE};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::gateway_client::{Gateway, GatewayError};

/// Whether a message is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

/// An in-progress inline title edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEdit {
    pub chat_id: i64,
    pub title: String,
}

/// A user message accepted for sending.
///
/// Remembers the conversation that was active when the send began; that is
/// where the exchange gets persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    chat_id: i64,
    text: String,
}

impl PendingSend {
    /// Conversation the exchange will be stored under.
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// The message as typed.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A successful exchange waiting to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedExchange {
    pub chat_id: i64,
    pub user_text: String,
    pub assistant_text: String,
}

/// State and event handling behind the chat page.
pub struct ChatController {
    store: Arc<dyn ConversationStore>,
    gateway: Arc<dyn Gateway>,
    chats: Vec<Chat>,
    current_chat: Option<i64>,
    transcript: Vec<Turn>,
    editing: Option<TitleEdit>,
    send_state: SendState,
}

impl ChatController {
    /// Create a controller with no conversation selected.
    pub fn new(store: Arc<dyn ConversationStore>, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            store,
            gateway,
            chats: Vec::new(),
            current_chat: None,
            transcript: Vec::new(),
            editing: None,
            send_state: SendState::Idle,
        }
    }

    /// Shared handle to the conversation store.
    pub fn store(&self) -> Arc<dyn ConversationStore> {
        Arc::clone(&self.store)
    }

    /// Shared handle to the completion gateway.
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Cached conversation list.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Active conversation, if any.
    pub fn current_chat(&self) -> Option<i64> {
        self.current_chat
    }

    /// Visible transcript of the active conversation.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Title edit in progress, if any.
    pub fn editing(&self) -> Option<&TitleEdit> {
        self.editing.as_ref()
    }

    /// Current send state.
    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    /// `true` while a message is in flight.
    pub fn is_sending(&self) -> bool {
        self.send_state == SendState::Sending
    }

    /// Reload the conversation list. On error the list is emptied.
    pub async fn load_conversations(&mut self) {
        match self.store.list_conversations().await {
            Ok(chats) => {
                debug!(count = chats.len(), "Loaded conversations");
                self.chats = chats;
            }
            Err(err) => {
                error!(error = %err, "Error fetching chats");
                self.chats.clear();
            }
        }
    }

    /// Create a conversation, make it active and start editing its title.
    ///
    /// Returns the new id, or `None` if the store rejected the insert.
    pub async fn create_conversation(&mut self) -> Option<i64> {
        let chat = match self.store.create_conversation(DEFAULT_CHAT_TITLE).await {
            Ok(chat) => chat,
            Err(err) => {
                error!(error = %err, "Error creating new chat");
                return None;
            }
        };

        info!(chat_id = chat.id, "Created conversation");
        let id = chat.id;
        self.editing = Some(TitleEdit {
            chat_id: id,
            title: chat.title.clone(),
        });
        self.chats.push(chat);
        self.current_chat = Some(id);
        self.transcript.clear();
        Some(id)
    }

    /// Make a conversation active and load its history.
    ///
    /// If the history cannot be loaded the previous transcript stays visible.
    pub async fn select_conversation(&mut self, chat_id: i64) {
        self.current_chat = Some(chat_id);

        match self.store.list_messages(chat_id).await {
            Ok(turns) => {
                debug!(chat_id, count = turns.len(), "Loaded history");
                self.transcript = turns;
            }
            Err(err) => error!(chat_id, error = %err, "Error fetching messages"),
        }
    }

    /// Enter edit mode for a conversation, pre-filled with its title.
    pub fn start_editing(&mut self, chat_id: i64) {
        if let Some(chat) = self.chats.iter().find(|chat| chat.id == chat_id) {
            self.editing = Some(TitleEdit {
                chat_id,
                title: chat.title.clone(),
            });
        }
    }

    /// Replace the draft title of the edit in progress.
    pub fn set_editing_title(&mut self, title: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.title = title.into();
        }
    }

    /// Save the draft title and leave edit mode.
    ///
    /// Edit mode is left whether or not the store accepted the change; the
    /// cached title only changes on success.
    pub async fn save_edited_title(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };

        match self
            .store
            .rename_conversation(edit.chat_id, &edit.title)
            .await
        {
            Ok(()) => {
                if let Some(chat) = self.chats.iter_mut().find(|chat| chat.id == edit.chat_id) {
                    chat.title = edit.title;
                }
            }
            Err(err) => error!(chat_id = edit.chat_id, error = %err, "Error updating chat title"),
        }
    }

    /// Save a title submitted from the editor of `chat_id`.
    ///
    /// Ignored unless that chat's editor is the one currently open, so a save
    /// that arrives after the user moved to another chat's editor cannot
    /// rename the wrong conversation.
    pub async fn save_title(&mut self, chat_id: i64, title: impl Into<String>) {
        if self.editing.as_ref().map(|edit| edit.chat_id) != Some(chat_id) {
            debug!(chat_id, "Ignoring title save for a closed editor");
            return;
        }

        self.set_editing_title(title);
        self.save_edited_title().await;
    }

    /// Accept `input` for sending.
    ///
    /// Returns `None` without touching state when the input is blank, no
    /// conversation is active, or a send is already in flight. Otherwise
    /// appends the user turn and enters `Sending`.
    pub fn prepare_send(&mut self, input: &str) -> Option<PendingSend> {
        if input.trim().is_empty() || self.is_sending() {
            return None;
        }
        let chat_id = self.current_chat?;

        self.transcript.push(Turn::user(input));
        self.send_state = SendState::Sending;

        Some(PendingSend {
            chat_id,
            text: input.to_string(),
        })
    }

    /// Apply the gateway's answer to a pending send.
    ///
    /// The assistant turn goes onto whatever transcript is visible now, even
    /// if the user switched conversation meanwhile. A failure is logged and
    /// the optimistic user turn is left in place. Stays in `Sending` until
    /// [`finish_send`](Self::finish_send).
    pub fn complete_send(
        &mut self,
        pending: PendingSend,
        reply: Result<String, GatewayError>,
    ) -> Option<CompletedExchange> {
        match reply {
            Ok(reply) => {
                self.transcript.push(Turn::assistant(reply.clone()));
                Some(CompletedExchange {
                    chat_id: pending.chat_id,
                    user_text: pending.text,
                    assistant_text: reply,
                })
            }
            Err(err) => {
                error!(chat_id = pending.chat_id, error = %err, "Error sending message");
                None
            }
        }
    }

    /// Return to `Idle`.
    pub fn finish_send(&mut self) {
        self.send_state = SendState::Idle;
    }

    /// Run a whole send while holding the controller exclusively.
    pub async fn send_message(&mut self, input: &str) {
        let Some(pending) = self.prepare_send(input) else {
            return;
        };

        let reply = self.gateway.send(pending.text()).await;
        if let Some(exchange) = self.complete_send(pending, reply) {
            persist_exchange(self.store.as_ref(), &exchange).await;
        }
        self.finish_send();
    }
}

/// Write both turns of an exchange. Failures are logged only.
pub async fn persist_exchange(store: &dyn ConversationStore, exchange: &CompletedExchange) {
    if let Err(err) = store
        .append_message_pair(
            exchange.chat_id,
            &exchange.user_text,
            &exchange.assistant_text,
        )
        .await
    {
        error!(chat_id = exchange.chat_id, error = %err, "Error saving messages");
    }
}

/// Finish a prepared send against a shared controller.
///
/// The lock is released during the gateway call and the store write, so
/// other UI actions can run meanwhile.
pub async fn run_send(controller: Arc<Mutex<ChatController>>, pending: PendingSend) {
    let (gateway, store) = {
        let controller = controller.lock().await;
        (controller.gateway(), controller.store())
    };

    let reply = gateway.send(pending.text()).await;
    let exchange = controller.lock().await.complete_send(pending, reply);

    if let Some(exchange) = exchange {
        persist_exchange(store.as_ref(), &exchange).await;
    }

    controller.lock().await.finish_send();
}
