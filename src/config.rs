//! Configuration module for mydrive.

use serde::Deserialize;
use std::path::Path;

use crate::{DriveError, Result};

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the drive API (scheme and host, no trailing path).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.ragastudios.cloud".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("mydrive/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Persisted client storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the key/value storage file.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Key the session token is stored under.
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_storage_path() -> String {
    "data/storage.json".to_string()
}

fn default_token_key() -> String {
    "token".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            token_key: default_token_key(),
        }
    }
}

/// File transfer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Directory downloaded files are saved to.
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

fn default_max_upload_size() -> u64 {
    10
}

fn default_download_dir() -> String {
    "downloads".to_string()
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: default_max_upload_size(),
            download_dir: default_download_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/mydrive.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Remote API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Persisted storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// File transfer configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DriveError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DriveError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `MYDRIVE_API_URL`: Override the API base URL
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("MYDRIVE_API_URL") {
            if !base_url.is_empty() {
                self.api.base_url = base_url;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The API base URL is not an http(s) URL
    /// - The token storage key is empty
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url)
            .map_err(|e| DriveError::Config(format!("invalid api.base_url: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(DriveError::Config(format!(
                    "unsupported api.base_url scheme: {scheme}"
                )));
            }
        }

        if self.storage.token_key.is_empty() {
            return Err(DriveError::Config(
                "storage.token_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
