//! Configuration data structures for bria-proxy.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the upstream Bria API connection and request limits.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Bria API settings.
    #[serde(default)]
    pub bria: BriaConfig,

    /// Inbound request limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `5000`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream Bria API connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct BriaConfig {
    /// Base URL every endpoint path is appended to.
    /// Default: `https://engine.prod.bria-api.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Value sent in the `api_token` header. Required.
    #[serde(default)]
    pub api_token: String,

    /// Text-to-image model version appended to the generation path.
    /// Default: `2.3`
    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Timeout for the prompt enhancement call.
    /// Default: `30000`
    #[serde(default = "default_prompt_timeout")]
    pub prompt_timeout_ms: u64,

    /// Timeout for the text-to-image call.
    /// Default: `60000`
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_ms: u64,

    /// Timeout for the background removal call.
    /// Default: `60000`
    #[serde(default = "default_removal_timeout")]
    pub removal_timeout_ms: u64,

    /// Maximum number of idle connections kept per upstream host.
    /// Default: `10`
    #[serde(default = "default_pool_size")]
    pub pool_max_idle_per_host: usize,
}

/// Limits enforced before anything is forwarded upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum prompt length for the text routes, in characters.
    /// Default: `2000`
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Maximum accepted request body size for uploads.
    /// Default: `10 MiB`
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Custom Debug impl that never logs the token
impl std::fmt::Debug for BriaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.api_token.is_empty() { "[UNSET]" } else { "[REDACTED]" };
        f.debug_struct("BriaConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &token)
            .field("model_version", &self.model_version)
            .field("prompt_timeout_ms", &self.prompt_timeout_ms)
            .field("generation_timeout_ms", &self.generation_timeout_ms)
            .field("removal_timeout_ms", &self.removal_timeout_ms)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BriaConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: String::new(),
            model_version: default_model_version(),
            prompt_timeout_ms: default_prompt_timeout(),
            generation_timeout_ms: default_generation_timeout(),
            removal_timeout_ms: default_removal_timeout(),
            pool_max_idle_per_host: default_pool_size(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_prompt_chars: default_max_prompt_chars(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_api_base_url() -> String {
    "https://engine.prod.bria-api.com/v1".to_string()
}

fn default_model_version() -> String {
    "2.3".to_string()
}

fn default_prompt_timeout() -> u64 {
    30_000
}

fn default_generation_timeout() -> u64 {
    60_000
}

fn default_removal_timeout() -> u64 {
    60_000
}

fn default_pool_size() -> usize {
    10
}

fn default_max_prompt_chars() -> usize {
    crate::models::MAX_PROMPT_LENGTH
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
