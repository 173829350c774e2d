// Error types for bria-proxy
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Image too large! Max upload size is {0} bytes.")]
    PayloadTooLarge(usize),

    #[error("Bria API request timed out after {0} ms")]
    Timeout(u64),

    #[error("Bria API rejected the configured API token")]
    InvalidCredentials,

    #[error("Bria API rate limit exceeded, please retry later")]
    TooManyRequests,

    #[error("Bria API error: HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Bria API error: {0}")]
    BriaApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Stable name of the failure class, used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Config(_) | ProxyError::ConfigParsing(_) => "configuration_error",
            ProxyError::InvalidRequest(_) | ProxyError::PayloadTooLarge(_) => {
                "invalid_request_error"
            }
            ProxyError::Timeout(_) => "timeout_error",
            ProxyError::InvalidCredentials => "authentication_error",
            ProxyError::TooManyRequests => "rate_limit_error",
            ProxyError::UpstreamStatus { .. } | ProxyError::BriaApi(_) | ProxyError::Http(_) => {
                "api_error"
            }
            _ => "internal_error",
        }
    }

    /// Input errors are 400 (413 for oversized uploads); every other
    /// failure is a 500, with the class carried in `details`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, ProxyError::InvalidRequest(_) | ProxyError::PayloadTooLarge(_))
    }

    /// Message that is safe to hand back to a browser.
    ///
    /// Transport and parsing errors can carry URLs or upstream payloads, so
    /// only the failure class is exposed for those.
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Http(_) => "Could not reach the Bria API".to_string(),
            ProxyError::Config(_) | ProxyError::ConfigParsing(_) | ProxyError::Internal(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// A `ProxyError` paired with the route-level message shown to the caller.
#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    source: ProxyError,
}

impl ApiError {
    pub fn new(context: &'static str, source: ProxyError) -> Self {
        Self { context, source }
    }

    pub fn inner(&self) -> &ProxyError {
        &self.source
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.source.status_code();

        let body = match &self.source {
            // Input errors are shown to the browser as-is
            input if input.is_client_error() => json!({ "error": input.to_string() }),
            other => {
                error!("{} ({}): {}", self.context, other.kind(), other);
                json!({
                    "error": self.context,
                    "details": other.public_message(),
                })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        ApiError::new("Internal server error", self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
