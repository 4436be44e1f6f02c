//! TOML-based client configuration.
//!
//! Holds the single external configuration value: the base URL of the
//! integration backend, with a hardcoded local-development fallback.
//! Configuration is stored at `~/.config/hublink/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured API base.
pub const API_BASE_ENV: &str = "HUBLINK_API_BASE";

fn default_api_base() -> String {
    "http://localhost:8000/api".to_string()
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend integration API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
        }
    }
}

/// Returns `~/.config/hublink[-dev]/` based on HUBLINK_ENV.
///
/// Set HUBLINK_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn config_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HUBLINK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hublink-dev")
    } else {
        base_dir.join("hublink")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load the configuration file, writing defaults back if it is missing.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Save the configuration file.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Resolve the effective configuration once at process start:
    /// file value, then environment override.
    pub fn resolve() -> Self {
        let mut cfg = Self::load_or_default();
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.is_empty() {
                cfg.api_base = base;
            }
        }
        cfg
    }
}
