// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{ProxyError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable the token is read from when no layered value is set.
pub const API_TOKEN_ENV: &str = "BRIA_API_TOKEN";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// CLI overrides are applied by the caller afterwards.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::from(path).required(config_path.is_some()))
            // Override with environment variables (e.g. BRIA_PROXY_SERVER__PORT)
            .add_source(
                Environment::with_prefix("BRIA_PROXY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ProxyError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| ProxyError::Config(e.to_string()))?;

        if app_config.bria.api_token.trim().is_empty() {
            if let Ok(token) = std::env::var(API_TOKEN_ENV) {
                app_config.bria.api_token = token;
            }
        }

        Ok(app_config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.bria.validate()?;

        if self.limits.max_prompt_chars == 0 {
            return Err(ProxyError::Config(
                "limits.max_prompt_chars must be greater than zero".to_string(),
            ));
        }

        if self.limits.max_upload_bytes == 0 {
            return Err(ProxyError::Config(
                "limits.max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bria-proxy")
            .join("config.toml")
    }
}

impl BriaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(ProxyError::Config(format!(
                "Bria API token is not configured; set {} or bria.api_token",
                API_TOKEN_ENV
            )));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ProxyError::Config(format!(
                "bria.api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        Ok(())
    }
}
