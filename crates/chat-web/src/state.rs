//! Application state shared across handlers.

use std::sync::Arc;

use completion::Completer;
use database::Database;
use tokio::sync::Mutex;

use crate::controller::ChatController;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Provider behind the `/api/chat` gateway.
    pub completer: Arc<dyn Completer>,
    /// UI controller for the single browser session.
    pub controller: Arc<Mutex<ChatController>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, completer: Arc<dyn Completer>, controller: ChatController) -> Self {
        Self {
            db,
            completer,
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}
