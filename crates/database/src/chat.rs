//! Conversation (chat) operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Chat;

/// Title given to freshly created conversations.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Create a new conversation and return it with its generated id.
pub async fn create_chat(pool: &SqlitePool, title: &str) -> Result<Chat> {
    let chat = sqlx::query_as::<_, Chat>(
        r#"
        INSERT INTO chats (title)
        VALUES (?)
        RETURNING id, title
        "#,
    )
    .bind(title)
    .fetch_one(pool)
    .await?;

    tracing::debug!(chat_id = chat.id, "Created chat");
    Ok(chat)
}

/// Get a conversation by id.
pub async fn get_chat(pool: &SqlitePool, id: i64) -> Result<Chat> {
    sqlx::query_as::<_, Chat>(
        r#"
        SELECT id, title
        FROM chats
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Chat",
        id: id.to_string(),
    })
}

/// List all conversations in store order.
pub async fn list_chats(pool: &SqlitePool) -> Result<Vec<Chat>> {
    let chats = sqlx::query_as::<_, Chat>(
        r#"
        SELECT id, title
        FROM chats
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(chats)
}

/// Replace the title of a conversation.
pub async fn rename_chat(pool: &SqlitePool, id: i64, title: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE chats
        SET title = ?
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Chat",
            id: id.to_string(),
        });
    }

    Ok(())
}
