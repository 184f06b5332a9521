//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Chat web server configuration.
///
/// Provider settings are read separately by
/// [`completion::CompletionConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Base URL of a remote completion gateway; `None` answers in-process.
    pub gateway_url: Option<String>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CHAT_ADDR` | Server bind address | `127.0.0.1:3000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:chat.db?mode=rwc` |
    /// | `CHAT_GATEWAY_URL` | Remote gateway base URL | (unset) |
    /// | `CHAT_STATIC_DIR` | Static asset directory | this crate's `static/` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("CHAT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:chat.db?mode=rwc".to_string());

        let gateway_url = match env::var("CHAT_GATEWAY_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) if url.starts_with("http://") || url.starts_with("https://") => Some(url),
            Ok(_) => return Err(ConfigError::InvalidGatewayUrl),
            Err(_) => None,
        };

        let static_dir = env::var("CHAT_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")));

        Ok(Self {
            addr,
            database_url,
            gateway_url,
            static_dir,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CHAT_ADDR format")]
    InvalidAddr,

    #[error("CHAT_GATEWAY_URL must be an http(s) URL")]
    InvalidGatewayUrl,
}
