//! # API Configuration
//!
//! Settings for the timetable API server, read from environment variables
//! (a `.env` file is honoured by the binaries through `dotenv`).
//!
//! ## Environment Variables
//!
//! - `API_HOST`: address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `STORAGE`: `postgres` or `memory` (default: "postgres")
//! - `DATABASE_URL`: PostgreSQL connection string (required for `postgres`)
//! - `LOG_LEVEL`: trace, debug, info, warn or error (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)
//! - `SESSION_TTL_HOURS`: lifetime of a login session (default: 168)

use eyre::{Result, WrapErr, eyre};
use std::env;
use std::str::FromStr;
use tracing::Level;

/// Where timetable data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(eyre!("Unknown STORAGE value: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageKind,
    /// Set whenever `storage` is [`StorageKind::Postgres`].
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origins: Option<Vec<String>>,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub session_ttl_hours: i64,
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl ApiConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - `STORAGE` is not a known backend
    /// - `DATABASE_URL` is missing while `STORAGE` is `postgres`
    /// - `API_PORT` or `SESSION_TTL_HOURS` cannot be parsed
    pub fn from_env() -> Result<Self> {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        let storage: StorageKind = env::var("STORAGE")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;
        let database_url = match storage {
            StorageKind::Postgres => Some(
                env::var("DATABASE_URL")
                    .wrap_err("DATABASE_URL environment variable must be set")?,
            ),
            StorageKind::Memory => env::var("DATABASE_URL").ok(),
        };

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .wrap_err("Invalid SESSION_TTL_HOURS value")?;

        Ok(Self {
            host,
            port,
            storage,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            session_ttl_hours,
        })
    }

    /// Formatted bind address, e.g. "127.0.0.1:3000".
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
