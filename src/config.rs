//! Configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::path::PathBuf;

use crate::domain::Theme;
use crate::error::ReviewError;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level configuration.
///
/// Loaded once at startup via [`ReviewConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Directory holding one JSON file per storage key.
    pub storage_dir: PathBuf,

    /// `false` keeps everything in memory for the lifetime of the process.
    pub persistence_enabled: bool,

    /// Capacity of the change-notification broadcast channel.
    pub event_bus_capacity: usize,

    /// Static agency login name (matched case-insensitively).
    pub agency_username: String,

    /// Static agency password (matched exactly).
    pub agency_password: String,

    /// Theme used when no preference has been stored.
    pub system_theme: Theme,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".campaign-review"),
            persistence_enabled: true,
            event_bus_capacity: 1024,
            agency_username: "BizyPro".to_string(),
            agency_password: "BizyPro1$!".to_string(),
            system_theme: Theme::Light,
            log_format: LogFormat::Text,
        }
    }
}

impl ReviewConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set or
    /// cannot be parsed. Calls `dotenvy::dotenv().ok()` to optionally load
    /// a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if the agency username or
    /// password is set to an empty string.
    pub fn from_env() -> Result<Self, ReviewError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let storage_dir = std::env::var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => defaults.log_format,
        };

        let config = Self {
            storage_dir,
            persistence_enabled: parse_env_bool("PERSISTENCE_ENABLED", defaults.persistence_enabled),
            event_bus_capacity: parse_env("EVENT_BUS_CAPACITY", defaults.event_bus_capacity),
            agency_username: std::env::var("AGENCY_USERNAME").unwrap_or(defaults.agency_username),
            agency_password: std::env::var("AGENCY_PASSWORD").unwrap_or(defaults.agency_password),
            system_theme: parse_env("SYSTEM_THEME", defaults.system_theme),
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that defaults cannot guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] if the agency credential is blank.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.agency_username.trim().is_empty() || self.agency_password.is_empty() {
            return Err(ReviewError::Validation(
                "agency username and password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
