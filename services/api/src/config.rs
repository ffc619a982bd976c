//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use idea_ranker_core::Session;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// When absent, ideas are kept in memory for the lifetime of the process.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub session_cache_path: PathBuf,
    pub cors_origin: String,
    /// The identity the local provider signs in as.
    pub identity: Session,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated the same as unset ones.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // --- Load Server and Storage Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = var("DATABASE_URL");

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let session_cache_path = var("SESSION_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.idea_ranker/session.json"));

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- Load the Local Identity Profile ---
        let uid = var("IDENTITY_UID")
            .ok_or_else(|| ConfigError::MissingVar("IDENTITY_UID".to_string()))?;
        let identity = Session {
            uid,
            display_name: var("IDENTITY_DISPLAY_NAME"),
            email: var("IDENTITY_EMAIL"),
            photo_url: var("IDENTITY_PHOTO_URL"),
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            session_cache_path,
            cors_origin,
            identity,
        })
    }
}
