//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;
use wellness_core::FragmentFallback;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    /// The chat credential. `None` leaves every session's chat uninitialized.
    pub google_api_key: Option<String>,
    pub gemini_api_base: String,
    pub chat_model: String,
    pub chat_streaming: bool,
    pub fragment_fallback: FragmentFallback,
    /// Sessions untouched for this long are dropped when the next one is created.
    pub session_idle_timeout: Duration,
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
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an explicit set of variables.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_vars(|key| vars.get(key).cloned())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Load Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load API Key (as optional) ---
        let google_api_key = var("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty());

        // --- Load Chat Adapter Settings ---
        let gemini_api_base = var("GEMINI_API_BASE").unwrap_or_else(|| {
            "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
        });
        let chat_model =
            var("CHAT_MODEL").unwrap_or_else(|| "gemini-2.0-flash-lite".to_string());

        let chat_streaming = match var("CHAT_STREAMING") {
            None => true,
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "CHAT_STREAMING".to_string(),
                    format!("'{}' is not a boolean", value),
                )
            })?,
        };

        let fragment_fallback = match var("FRAGMENT_FALLBACK") {
            None => FragmentFallback::default(),
            Some(value) => value
                .parse::<FragmentFallback>()
                .map_err(|e| ConfigError::InvalidValue("FRAGMENT_FALLBACK".to_string(), e))?,
        };

        let idle_minutes_str = var("SESSION_IDLE_MINUTES").unwrap_or_else(|| "30".to_string());
        let idle_minutes = idle_minutes_str.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "SESSION_IDLE_MINUTES".to_string(),
                format!("'{}' is not a whole number of minutes", idle_minutes_str),
            )
        })?;
        let session_idle_timeout = Duration::from_secs(idle_minutes * 60);

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            google_api_key,
            gemini_api_base,
            chat_model,
            chat_streaming,
            fragment_fallback,
            session_idle_timeout,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
