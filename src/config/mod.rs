//! Configuration module for the Lost & Found backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Admin key used when `LOSTFOUND_ADMIN_KEY` is unset.
pub const DEFAULT_ADMIN_KEY: &str = "FBLA2025";

/// Storage key under which the whole item collection is kept.
pub const DEFAULT_STORAGE_KEY: &str = "FBLA2025";

/// Photos arrive inline as data URLs, so the body limit is well above axum's 2 MiB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Static shared secret for the admin view. Not a security boundary:
    /// anyone operating the page can learn it.
    pub admin_key: String,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Key of the single storage entry holding the item collection
    pub storage_key: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let admin_key =
            env::var("LOSTFOUND_ADMIN_KEY").unwrap_or_else(|_| DEFAULT_ADMIN_KEY.to_string());

        let db_path = env::var("LOSTFOUND_DB_PATH")
            .unwrap_or_else(|_| "./data/lostfound.sqlite".to_string())
            .into();

        let storage_key =
            env::var("LOSTFOUND_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());

        let bind_addr = env::var("LOSTFOUND_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid LOSTFOUND_BIND_ADDR: {}", e)))?;

        let log_level = env::var("LOSTFOUND_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_body_bytes = match env::var("LOSTFOUND_MAX_BODY_BYTES") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::Internal(format!("Invalid LOSTFOUND_MAX_BODY_BYTES: {}", e))
            })?,
            Err(_) => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            admin_key,
            db_path,
            storage_key,
            bind_addr,
            log_level,
            max_body_bytes,
        })
    }

    /// Whether the admin gate still uses the built-in key.
    pub fn uses_default_admin_key(&self) -> bool {
        self.admin_key == DEFAULT_ADMIN_KEY
    }
}
