use anyhow::{Context, Result};

const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a sensible default so the service runs out of the box.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory under which uploaded documents live.
    pub data_root: String,
    /// Maximum accepted document size in bytes.
    pub max_file_size: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_root: std::env::var("DATA_ROOT").unwrap_or_else(|_| "data".to_string()),
            max_file_size: std::env::var("MAX_FILE_SIZE")
                .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE.to_string())
                .parse::<u64>()
                .context("MAX_FILE_SIZE must be a byte count")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
