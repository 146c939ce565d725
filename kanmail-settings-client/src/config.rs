//! Client configuration
//!
//! Resolution order: environment variables, then the JSON file under the
//! platform config directory, then built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{ClientError, Result};

pub const ENV_API_URL: &str = "KANMAIL_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "KANMAIL_API_TIMEOUT_SECS";
pub const ENV_LOAD_RETRIES: &str = "KANMAIL_API_LOAD_RETRIES";

/// Address of a locally running Kanmail backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4420";
pub const DEFAULT_LOAD_RETRIES: u32 = 2;

/// Connection settings for the Kanmail backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied to the initial load and the autoconfiguration probe; save
    /// never times out. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Retries for the initial load only
    pub load_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            load_retries: DEFAULT_LOAD_RETRIES,
        }
    }
}

/// `<config_dir>/kanmail/settings-client.json`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kanmail").join("settings-client.json"))
}

impl ClientConfig {
    /// Resolve from the process environment and the default config file
    pub fn resolve() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        log::debug!("Resolved client config: {config:?}");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| ClientError::ConfigError {
            detail: format!("read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&data).map_err(|e| ClientError::ConfigError {
            detail: format!("parse {}: {e}", path.display()),
        })
    }

    /// Override fields with whatever `lookup` finds for the `KANMAIL_API_*` keys.
    ///
    /// Unparseable numeric values are an error rather than silently ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = Some(parse_env_number(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(retries) = lookup(ENV_LOAD_RETRIES) {
            self.load_retries = parse_env_number(ENV_LOAD_RETRIES, &retries)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: self.base_url.clone(),
                detail: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ClientError::ConfigError {
                detail: "request timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Absolute URL of an API path, relative to any path prefix of `base_url`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base()?;
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                detail: e.to_string(),
            })
    }

    fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            detail: e.to_string(),
        })
    }
}

fn parse_env_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ClientError::ConfigError {
        detail: format!("{key} must be a non-negative integer, got '{value}'"),
    })
}
