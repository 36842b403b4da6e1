//! Configuration management for cinefetch
//!
//! Handles config file loading/saving and API key lookup.
//! Config is stored at ~/.config/cinefetch/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::tmdb::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_POSTER_SIZE};

/// Environment variable holding the TMDB API read token
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable overriding the TMDB endpoint
pub const BASE_URL_ENV: &str = "TMDB_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No TMDB API key: set TMDB_API_KEY or tmdb_api_key in the config file")]
    MissingApiKey,
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TMDB API read access token
    pub tmdb_api_key: Option<String>,
    /// TMDB REST endpoint
    pub api_base_url: Option<String>,
    /// TMDB image CDN root
    pub image_base_url: Option<String>,
    /// Poster width segment (w92 .. w780, original)
    pub poster_size: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get config file path (~/.config/cinefetch/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinefetch").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from `path`; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        };

        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// TMDB API key, from the environment first and then the config file
    pub fn tmdb_api_key(&self) -> Result<String, ConfigError> {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with(&self, env: Option<String>) -> Result<String, ConfigError> {
        env.or_else(|| self.tmdb_api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// TMDB endpoint, from the environment first and then the config file
    pub fn api_base_url(&self) -> String {
        self.base_url_with(std::env::var(BASE_URL_ENV).ok())
    }

    fn base_url_with(&self, env: Option<String>) -> String {
        env.or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url.as_deref().unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }

    pub fn poster_size(&self) -> &str {
        self.poster_size.as_deref().unwrap_or(DEFAULT_POSTER_SIZE)
    }

    /// Per-request timeout; zero means "use the default"
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}
