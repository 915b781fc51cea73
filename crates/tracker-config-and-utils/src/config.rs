//! Configuration management for the sync tracker.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default backend URL (can be overridden at compile time via TOUCHLINE_BACKEND_URL env var).
pub const DEFAULT_BACKEND_URL: &str = match option_env!("TOUCHLINE_BACKEND_URL") {
    Some(url) => url,
    None => "https://api.touchline.app",
};

/// Default backend publishable key (can be overridden at compile time via
/// TOUCHLINE_BACKEND_PUBLISHABLE_KEY env var).
pub const DEFAULT_BACKEND_PUBLISHABLE_KEY: &str =
    match option_env!("TOUCHLINE_BACKEND_PUBLISHABLE_KEY") {
        Some(key) => key,
        None => "touchline-publishable-key",
    };

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Backend project URL probed for reachability and used by sync collaborators.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Backend publishable API key (public, safe to expose).
    #[serde(default = "default_backend_publishable_key")]
    pub backend_publishable_key: String,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_backend_publishable_key() -> String {
    DEFAULT_BACKEND_PUBLISHABLE_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_publishable_key: DEFAULT_BACKEND_PUBLISHABLE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from a file, falling back to defaults.
    /// Note: backend_url and backend_publishable_key are compile-time only
    /// and will always use the built-in defaults, regardless of what's in
    /// the config file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        // Force compile-time values (never from config file)
        config.backend_url = DEFAULT_BACKEND_URL.to_string();
        config.backend_publishable_key = DEFAULT_BACKEND_PUBLISHABLE_KEY.to_string();

        // Environment variables can only override log_level
        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    /// Note: backend_url and backend_publishable_key are compile-time only
    /// (set via env vars during build). Only log_level can be overridden
    /// at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("TOUCHLINE_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Get the backend URL as a parsed URL.
    pub fn backend_url(&self) -> CoreResult<Url> {
        Url::parse(&self.backend_url).map_err(CoreError::from)
    }
}
