//! Chat web interface for parley.
//!
//! Serves an HTMX + server-rendered chat page, the `POST /api/chat`
//! completion gateway, and a small JSON API over the conversation store.

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod gateway_client;
pub mod markdown;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the application: all routes plus static assets from `static_dir`.
pub fn app(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    routes::router()
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .with_state(state)
}
