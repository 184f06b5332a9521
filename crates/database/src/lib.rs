//! SQLite conversation store for parley.
//!
//! This crate provides async database operations for conversations (`chats`)
//! and their message turns (`messages`) using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{chat, message, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:chat.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Start a conversation and record one exchange
//!     let chat = chat::create_chat(db.pool(), chat::DEFAULT_CHAT_TITLE).await?;
//!     message::append_message_pair(db.pool(), chat.id, "Hello", "Hi there").await?;
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod error;
pub mod message;
pub mod models;
pub mod store;

pub use chat::DEFAULT_CHAT_TITLE;
pub use error::{DatabaseError, Result};
pub use models::{Chat, Message, Role, Turn};
pub use store::ConversationStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
///
/// Created once at startup and shared by cloning; call [`Database::close`]
/// on shutdown to release the connections.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/chat.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that a connection can be acquired and answers a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool.
    ///
    /// Every later query fails with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connections released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let db = test_db().await;
        let store: &dyn ConversationStore = &db;

        // Create
        let chat = store.create_conversation(DEFAULT_CHAT_TITLE).await.unwrap();
        assert_eq!(chat.title, "New Chat");

        // Rename
        store.rename_conversation(chat.id, "Groceries").await.unwrap();
        let chats = store.list_conversations().await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].title, "Groceries");

        // History
        store
            .append_message_pair(chat.id, "Milk?", "Two litres.")
            .await
            .unwrap();
        let turns = store.list_messages(chat.id).await.unwrap();
        assert_eq!(turns, vec![Turn::user("Milk?"), Turn::assistant("Two litres.")]);
    }

    #[tokio::test]
    async fn test_migrate_is_repeatable() {
        let db = test_db().await;
        db.migrate().await.unwrap();
        assert!(chat::list_chats(db.pool()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_errors() {
        let db = test_db().await;
        db.close().await;

        let result = chat::list_chats(db.pool()).await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
        assert!(db.ping().await.is_err());
    }
}
