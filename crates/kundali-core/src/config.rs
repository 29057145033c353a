use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://192.168.210.8:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "KUNDALI_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "KUNDALI_TIMEOUT_SECS";

/// Persisted settings, `~/.config/astro-kundali/config.json`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    /// Request timeout in seconds; 0 disables the timeout
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;

        Ok(config_dir.join("astro-kundali").join("config.json"))
    }
}

impl From<&ServiceConfig> for Config {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            api_url: Some(service.base_url.clone()),
            timeout_secs: Some(service.timeout.map(|t| t.as_secs()).unwrap_or(0)),
        }
    }
}

/// Values given on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Where and how to reach the astrology service.
///
/// Resolved once at startup and handed to the client; nothing else reads
/// the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl ServiceConfig {
    /// Command line, then environment, then config file, then defaults
    pub fn resolve(overrides: &Overrides, file: &Config) -> Result<Self> {
        Self::resolve_with_env(overrides, file, |key| std::env::var(key).ok())
    }

    pub fn resolve_with_env(
        overrides: &Overrides,
        file: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_url = overrides
            .api_url
            .clone()
            .or_else(|| env(ENV_API_URL))
            .or_else(|| file.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = normalize_url(&base_url)?;

        let env_timeout = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::config(format!(
                    "{} must be a number of seconds, got {:?}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?),
            None => None,
        };
        let timeout_secs = overrides
            .timeout_secs
            .or(env_timeout)
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_url(raw: &str) -> Result<String> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(Error::config("service address is empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::config(format!(
            "service address must start with http:// or https://, got {:?}",
            raw
        )));
    }
    Ok(url.to_string())
}
