//! Configuration management for the DriveShare client.
//!
//! Loads configuration from ${DRIVESHARE_HOME}/config.toml with sensible
//! defaults. The backend base URL resolves with precedence
//! env > config > default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Base URL used when neither the environment nor the config names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "DRIVESHARE_BASE_URL";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL (optional; `DRIVESHARE_BASE_URL` wins over this)
    pub base_url: Option<String>,

    /// Whole-request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the backend base URL with precedence
    /// explicit override (e.g. a CLI flag) > env > config > default,
    /// validated and normalized to end with `/` so endpoint suffixes join
    /// cleanly.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is not well-formed.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> Result<String> {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(override_url, env_value.as_deref(), self.base_url.as_deref())
    }

    /// The configured request timeout, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0)
            .then(|| Duration::from_secs(u64::from(self.request_timeout_secs)))
    }
}

/// Resolves a base URL with precedence: override > env value > config value
/// > default.
fn resolve_base_url(
    override_url: Option<&str>,
    env_value: Option<&str>,
    config_value: Option<&str>,
) -> Result<String> {
    for candidate in [override_url, env_value, config_value].into_iter().flatten() {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(ensure_trailing_slash(trimmed));
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;
    Ok(())
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

pub mod paths {
    //! Path resolution for DriveShare configuration.
    //!
    //! DRIVESHARE_HOME resolution order:
    //! 1. DRIVESHARE_HOME environment variable (if set)
    //! 2. ~/.config/driveshare (default)

    use std::path::PathBuf;

    /// Returns the DriveShare home directory.
    pub fn driveshare_home() -> PathBuf {
        if let Ok(home) = std::env::var("DRIVESHARE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("driveshare"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        driveshare_home().join("config.toml")
    }
}
