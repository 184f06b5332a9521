//! The conversation store seam used by the chat controller.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Chat, Turn};
use crate::{chat, message, Database};

/// Accessor over the two conversation tables.
///
/// Each call is a single pass-through to the backing store; nothing spans
/// more than one call.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All conversations in store order.
    async fn list_conversations(&self) -> Result<Vec<Chat>>;

    /// Insert a conversation with the given title and return it.
    async fn create_conversation(&self, title: &str) -> Result<Chat>;

    /// Replace a conversation's title.
    async fn rename_conversation(&self, id: i64, title: &str) -> Result<()>;

    /// A conversation's turns, oldest first.
    async fn list_messages(&self, chat_id: i64) -> Result<Vec<Turn>>;

    /// Store a user turn and the assistant turn that answered it.
    async fn append_message_pair(
        &self,
        chat_id: i64,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<()>;
}

#[async_trait]
impl ConversationStore for Database {
    async fn list_conversations(&self) -> Result<Vec<Chat>> {
        chat::list_chats(self.pool()).await
    }

    async fn create_conversation(&self, title: &str) -> Result<Chat> {
        chat::create_chat(self.pool(), title).await
    }

    async fn rename_conversation(&self, id: i64, title: &str) -> Result<()> {
        chat::rename_chat(self.pool(), id, title).await
    }

    async fn list_messages(&self, chat_id: i64) -> Result<Vec<Turn>> {
        message::list_turns(self.pool(), chat_id).await
    }

    async fn append_message_pair(
        &self,
        chat_id: i64,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<()> {
        message::append_message_pair(self.pool(), chat_id, user_text, assistant_text).await
    }
}
