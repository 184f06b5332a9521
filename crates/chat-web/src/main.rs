//! Chat web server.
//!
//! Loads configuration, opens the conversation store, wires the completion
//! gateway and serves the chat UI until Ctrl-C.

use std::sync::Arc;

use chat_web::config::Config;
use chat_web::controller::ChatController;
use chat_web::gateway_client::{Gateway, HttpGateway, LocalGateway};
use chat_web::state::AppState;
use completion::{Completer, CompletionClient};
use database::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting chat web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Completion provider behind /api/chat
    let completer: Arc<dyn Completer> = Arc::new(CompletionClient::from_env()?);

    // The controller reaches the gateway over HTTP only when pointed elsewhere
    let gateway: Arc<dyn Gateway> = match &config.gateway_url {
        Some(url) => {
            let gateway = HttpGateway::new(url)?;
            info!(endpoint = gateway.endpoint(), "Using remote completion gateway");
            Arc::new(gateway)
        }
        None => Arc::new(LocalGateway::new(completer.clone())),
    };

    let mut controller = ChatController::new(Arc::new(db.clone()), gateway);
    controller.load_conversations().await;

    // Build application state
    let state = AppState::new(db.clone(), completer, controller);
    let app = chat_web::app(state, &config.static_dir);

    // Start server
    info!(addr = %config.addr, "Chat web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Chat web server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
