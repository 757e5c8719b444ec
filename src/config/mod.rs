//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Range validation
//! - Provider, fetcher and log format selection
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use credibility_analyzer::config::{Config, ProviderKind, SecretString};
//!
//! let config = Config {
//!     provider: ProviderKind::Anthropic,
//!     api_key: Some(SecretString::new("sk-ant-example-key")),
//!     ..Config::default()
//! };
//!
//! let debug = format!("{config:?}");
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

use std::path::PathBuf;
use std::str::FromStr;

pub use secret::SecretString;
pub use validation::{
    validate_config, MAX_RECENT_LIMIT, MAX_RETRIES, MAX_TIMEOUT_MS, MIN_RECENT_LIMIT,
    MIN_TIMEOUT_MS,
};

use crate::error::ConfigError;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default deadline for one analysis, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = crate::service::DEFAULT_REQUEST_TIMEOUT_MS;

/// Default deadline for fetching an article, in milliseconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = crate::fetch::DEFAULT_FETCH_TIMEOUT_MS;

/// Default maximum retry attempts against the Anthropic API.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default length of the recent-analyses list.
pub const DEFAULT_RECENT_LIMIT: usize = crate::service::DEFAULT_RECENT_LIMIT;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = crate::anthropic::DEFAULT_MODEL;

/// Which scoring provider to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Canned keyword-routed assessments.
    #[default]
    Fixture,
    /// Indicator-word heuristic.
    Heuristic,
    /// Anthropic Messages API.
    Anthropic,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixture" => Ok(Self::Fixture),
            "heuristic" => Ok(Self::Heuristic),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(ConfigError::InvalidValue {
                var: "ANALYZER_PROVIDER".into(),
                reason: format!("unknown provider '{s}' (expected fixture, heuristic or anthropic)"),
            }),
        }
    }
}

/// How URL submissions are turned into documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetcherKind {
    /// Score the URL itself without network access.
    #[default]
    Passthrough,
    /// Download and extract the article.
    Http,
}

impl FromStr for FetcherKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" => Ok(Self::Passthrough),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidValue {
                var: "ARTICLE_FETCHER".into(),
                reason: format!("unknown fetcher '{s}' (expected passthrough or http)"),
            }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                var: "LOG_FORMAT".into(),
                reason: format!("unknown format '{s}' (expected text or json)"),
            }),
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load it from environment variables.
/// The API key is a [`SecretString`] so it never shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_addr: String,
    /// Log filter directive (error, warn, info, debug, trace).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Scoring provider.
    pub provider: ProviderKind,
    /// Article fetcher for URL submissions.
    pub fetcher: FetcherKind,
    /// Anthropic API key, required by [`ProviderKind::Anthropic`].
    pub api_key: Option<SecretString>,
    /// Anthropic model.
    pub model: String,
    /// `SQLite` history file; `None` keeps history in memory.
    pub database_path: Option<PathBuf>,
    /// Deadline for one analysis in milliseconds.
    pub request_timeout_ms: u64,
    /// Deadline for fetching one article in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Retry attempts against the Anthropic API.
    pub max_retries: u32,
    /// Length of the recent-analyses list.
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
            provider: ProviderKind::default(),
            fetcher: FetcherKind::default(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            database_path: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional except `ANTHROPIC_API_KEY`, which is
    /// required when `ANALYZER_PROVIDER=anthropic`:
    /// - `BIND_ADDR` (default `127.0.0.1:8000`)
    /// - `LOG_LEVEL` (default `info`), `LOG_FORMAT` (`text` or `json`)
    /// - `ANALYZER_PROVIDER` (`fixture`, `heuristic` or `anthropic`)
    /// - `ARTICLE_FETCHER` (`passthrough` or `http`)
    /// - `ANTHROPIC_MODEL`, `MAX_RETRIES`
    /// - `HISTORY_DATABASE_PATH` (unset keeps history in memory)
    /// - `REQUEST_TIMEOUT_MS`, `FETCH_TIMEOUT_MS`, `RECENT_LIMIT`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value cannot be parsed, a required value
    /// is missing, or any value fails [`validate_config`].
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let provider = parse_env("ANALYZER_PROVIDER", ProviderKind::default())?;

        let api_key = env_non_blank("ANTHROPIC_API_KEY").map(SecretString::new);
        if provider == ProviderKind::Anthropic && api_key.is_none() {
            return Err(ConfigError::MissingRequired {
                var: "ANTHROPIC_API_KEY".into(),
            });
        }

        let config = Self {
            bind_addr: env_non_blank("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            log_level: env_non_blank("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
            log_format: parse_env("LOG_FORMAT", LogFormat::default())?,
            provider,
            fetcher: parse_env("ARTICLE_FETCHER", FetcherKind::default())?,
            api_key,
            model: env_non_blank("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            database_path: env_non_blank("HISTORY_DATABASE_PATH").map(PathBuf::from),
            request_timeout_ms: parse_env_number("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?,
            fetch_timeout_ms: parse_env_number("FETCH_TIMEOUT_MS", DEFAULT_FETCH_TIMEOUT_MS)?,
            max_retries: parse_env_number("MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            recent_limit: parse_env_number("RECENT_LIMIT", DEFAULT_RECENT_LIMIT)?,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// The variable's value, or `None` if unset or blank.
fn env_non_blank(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an enum-valued variable, using a default if unset.
fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    env_non_blank(name).map_or(Ok(default), |val| val.parse())
}

/// Parse a non-negative integer variable, using a default if unset.
fn parse_env_number<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    env_non_blank(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a non-negative integer".into(),
        })
    })
}
