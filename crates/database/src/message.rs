//! Message history operations.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Message, Role, Turn};

/// List the messages of a conversation, oldest first.
///
/// Rows written by the same statement share a timestamp, so `id` breaks ties.
pub async fn list_messages(pool: &SqlitePool, chat_id: i64) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, chat_id, role, content, created_at
        FROM messages
        WHERE chat_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(chat_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List the messages of a conversation as role/content turns.
pub async fn list_turns(pool: &SqlitePool, chat_id: i64) -> Result<Vec<Turn>> {
    let messages = list_messages(pool, chat_id).await?;
    Ok(messages.into_iter().map(Turn::from).collect())
}

/// Append one user turn followed by one assistant turn.
pub async fn append_message_pair(
    pool: &SqlitePool,
    chat_id: i64,
    user_text: &str,
    assistant_text: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO messages (chat_id, role, content)
        VALUES (?, ?, ?), (?, ?, ?)
        "#,
    )
    .bind(chat_id)
    .bind(Role::User)
    .bind(user_text)
    .bind(chat_id)
    .bind(Role::Assistant)
    .bind(assistant_text)
    .execute(pool)
    .await?;

    tracing::debug!(chat_id, "Appended message pair");
    Ok(())
}

/// Count the messages stored for a conversation.
pub async fn count_messages(pool: &SqlitePool, chat_id: i64) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM messages
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}
