//! Agent configuration
//!
//! Values are resolved with the priority: environment variables > config file
//! > built-in defaults. The config file is optional and lives in the
//! platform's standard config directory as `config.toml`:
//!
//! ```toml
//! [sportarr]
//! api_url = "https://sportarr.net"
//! cache_ttl_secs = 3600
//! http_timeout_secs = 30
//! cache_disabled = false
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default catalog service location
pub const DEFAULT_API_URL: &str = "https://sportarr.net";

/// Default freshness window for cached catalog responses
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Default per-request timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_API_URL: &str = "SPORTARR_API_URL";
const ENV_CACHE_TTL: &str = "SPORTARR_CACHE_TTL_SECS";
const ENV_HTTP_TIMEOUT: &str = "SPORTARR_HTTP_TIMEOUT_SECS";
const ENV_CACHE_DISABLED: &str = "SPORTARR_CACHE_DISABLED";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A setting has a value that cannot be used
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// TOML config file format
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    sportarr: Option<SportarrSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SportarrSection {
    api_url: Option<String>,
    cache_ttl_secs: Option<u64>,
    http_timeout_secs: Option<u64>,
    cache_disabled: Option<bool>,
}

/// Runtime settings for the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Catalog base URL without a trailing slash
    pub base_url: String,
    /// How long catalog responses are served from the local cache
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Whether catalog responses are cached at all
    pub cache_enabled: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: DEFAULT_HTTP_TIMEOUT,
            cache_enabled: true,
        }
    }
}

impl AgentConfig {
    /// Loads configuration from the environment and the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match config_path() {
            Some(path) if path.exists() => Some(read_config_file(&path)?),
            _ => None,
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Loads configuration from the environment and an explicit config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file = read_config_file(path)?;
        Self::resolve(Some(file), |key| std::env::var(key).ok())
    }

    /// Applies env > file > default priority. `env` is injected so tests
    /// don't have to touch the process environment.
    fn resolve<F>(file: Option<ConfigFile>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = file.and_then(|f| f.sportarr).unwrap_or_default();
        let defaults = Self::default();

        let base_url = env(ENV_API_URL)
            .or(section.api_url)
            .unwrap_or(defaults.base_url);
        let base_url =
            normalize_base_url(&base_url).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_API_URL,
                value: base_url.clone(),
            })?;

        let cache_ttl = match env(ENV_CACHE_TTL) {
            Some(raw) => Duration::from_secs(parse_secs(ENV_CACHE_TTL, &raw)?),
            None => section
                .cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
        };

        let request_timeout = match env(ENV_HTTP_TIMEOUT) {
            Some(raw) => Duration::from_secs(parse_secs(ENV_HTTP_TIMEOUT, &raw)?),
            None => section
                .http_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        };

        let cache_disabled = match env(ENV_CACHE_DISABLED) {
            Some(raw) => parse_flag(ENV_CACHE_DISABLED, &raw)?,
            None => section.cache_disabled.unwrap_or(false),
        };

        Ok(Self {
            base_url,
            cache_ttl,
            request_timeout,
            cache_enabled: !cache_disabled,
        })
    }
}

/// Path of the optional config file in the platform config directory
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("net", "sportarr", "sportarr-agent")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        None
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
