//! Configuration management.
//!
//! Configuration lives in `~/.bucketbot/config.json`:
//!
//! ```json
//! {
//!   "bot_token": "123456:ABC...",
//!   "authorized_user": "123456789",
//!   "well": { "api_key": "...", "url": "https://..." }
//! }
//! ```
//!
//! Falls back to environment variables (`BUCKETBOT_TOKEN`,
//! `BUCKETBOT_USER_ID`, `WELL_API_KEY`, optional `WELL_API_URL`) if no
//! config file exists. A `~/.bucketbot/.env` file is honored.

use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use teloxide::types::UserId;

/// Default Well API endpoint, overridable via `well.url` or `WELL_API_URL`.
pub const DEFAULT_WELL_URL: &str = "https://vulkan.sumeetsaini.com/well";

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Get the .bucketbot config directory path.
fn config_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".bucketbot"))
        .unwrap_or_else(|| PathBuf::from(".bucketbot"))
}

/// JSON configuration file structure.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    bot_token: String,
    authorized_user: UserIdValue,
    well: WellConfigFile,
}

/// Well section of the configuration file.
#[derive(Debug, Deserialize)]
struct WellConfigFile {
    api_key: String,
    #[serde(default = "default_well_url")]
    url: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

/// User ID that can be either string or integer in JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum UserIdValue {
    String(String),
    Integer(u64),
}

impl UserIdValue {
    fn to_user_id(&self) -> Result<UserId, ConfigError> {
        match self {
            UserIdValue::String(s) => s.parse::<u64>().map(UserId).map_err(|_| {
                ConfigError::MissingField("authorized_user must be a valid integer".to_string())
            }),
            UserIdValue::Integer(i) => Ok(UserId(*i)),
        }
    }
}

fn default_well_url() -> String {
    DEFAULT_WELL_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Well API configuration.
#[derive(Debug, Clone)]
pub struct WellConfig {
    pub url: String,
    pub api_key: String,
    /// Request timeout for submission calls, in seconds.
    pub timeout_seconds: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// System hostname
    pub hostname: String,
    /// Telegram bot token
    pub bot_token: String,
    /// The single user permitted to interact with the bot
    pub authorized_user: UserId,
    /// Well API configuration
    pub well: WellConfig,
}

impl Config {
    /// Load configuration from the JSON file, falling back to environment
    /// variables.
    ///
    /// Search order:
    /// 1. Provided config_path (if any)
    /// 2. `~/.bucketbot/config.json`
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if path.exists() {
                return Self::from_json(&path);
            }
        }

        let default_path = default_config_path();
        if default_path.exists() {
            return Self::from_json(&default_path);
        }

        Self::from_env()
    }

    /// Load configuration from a JSON file.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&content)?;

        if file.bot_token.is_empty() {
            return Err(ConfigError::MissingField("bot_token".to_string()));
        }
        if file.well.api_key.is_empty() {
            return Err(ConfigError::MissingField("well.api_key".to_string()));
        }

        Ok(Self {
            hostname: get_hostname(),
            bot_token: file.bot_token,
            authorized_user: file.authorized_user.to_user_id()?,
            well: WellConfig {
                url: file.well.url,
                api_key: file.well.api_key,
                timeout_seconds: file.well.timeout_seconds,
            },
        })
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::from_path(config_dir().join(".env"));

        let bot_token = env::var("BUCKETBOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("BUCKETBOT_TOKEN".to_string()))?;

        let user_id_str = env::var("BUCKETBOT_USER_ID")
            .map_err(|_| ConfigError::MissingEnvVar("BUCKETBOT_USER_ID".to_string()))?;
        let authorized_user = user_id_str.parse::<u64>().map(UserId).map_err(|_| {
            ConfigError::MissingField("BUCKETBOT_USER_ID must be a valid integer".to_string())
        })?;

        let api_key = env::var("WELL_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("WELL_API_KEY".to_string()))?;

        let url = env::var("WELL_API_URL").unwrap_or_else(|_| default_well_url());

        Ok(Self {
            hostname: get_hostname(),
            bot_token,
            authorized_user,
            well: WellConfig {
                url,
                api_key,
                timeout_seconds: default_timeout_seconds(),
            },
        })
    }
}

/// Get system hostname.
fn get_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_with_string_user_id() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{
                "bot_token": "test_token",
                "authorized_user": "123456",
                "well": { "api_key": "secret" }
            }"#,
        )
        .unwrap();

        let config = Config::from_json(&config_path).unwrap();
        assert_eq!(config.bot_token, "test_token");
        assert_eq!(config.authorized_user, UserId(123456));
        assert_eq!(config.well.api_key, "secret");
        assert_eq!(config.well.url, DEFAULT_WELL_URL); // Default
        assert_eq!(config.well.timeout_seconds, 30); // Default
    }

    #[test]
    fn test_config_with_int_user_id() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{
                "bot_token": "test_token",
                "authorized_user": 123456,
                "well": { "api_key": "secret" }
            }"#,
        )
        .unwrap();

        let config = Config::from_json(&config_path).unwrap();
        assert_eq!(config.authorized_user, UserId(123456));
    }

    #[test]
    fn test_config_with_custom_well() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{
                "bot_token": "test_token",
                "authorized_user": 1,
                "well": {
                    "api_key": "secret",
                    "url": "https://well.example.org/entries",
                    "timeout_seconds": 10
                }
            }"#,
        )
        .unwrap();

        let config = Config::from_json(&config_path).unwrap();
        assert_eq!(config.well.url, "https://well.example.org/entries");
        assert_eq!(config.well.timeout_seconds, 10);
    }

    #[test]
    fn test_config_missing_token() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"authorized_user": 1, "well": {"api_key": "secret"}}"#,
        )
        .unwrap();

        let result = Config::from_json(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_missing_api_key() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"bot_token": "t", "authorized_user": 1, "well": {"api_key": ""}}"#,
        )
        .unwrap();

        let result = Config::from_json(&config_path);
        assert!(matches!(result, Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_config_bad_user_id() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"bot_token": "t", "authorized_user": "not-a-number", "well": {"api_key": "k"}}"#,
        )
        .unwrap();

        let result = Config::from_json(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_not_found() {
        let result = Config::from_json(Path::new("/nonexistent/path.json"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
