// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{ApiError, ProxyError};
use crate::forwarders;
use crate::metrics;
use crate::models::upload::DEFAULT_CONTENT_TYPE;
use crate::models::{
    BackgroundRemovalOptions, ImageGeneration, PromptEnhancement, UploadedImage,
};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info};

const PROMPT_FAILED: &str = "Failed to enhance prompt. Please try again.";
const IMAGE_FAILED: &str = "Failed to generate image. Please try again.";
const REMOVEBG_FAILED: &str = "Failed to remove background. Please try again.";

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    // Startup refuses to run without a token, so reaching here means it is set
    checks.insert(
        "credentials".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: "Bria API token configured".to_string(),
        },
    );

    checks.insert(
        "configuration".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "API base: {}, model version: {}",
                state.bria_client.base_url(),
                state.bria_client.model_version()
            ),
        },
    );

    Json(HealthResponse {
        status: HealthStatus::Healthy,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for `GET /prompt/:text`
pub async fn prompt_handler(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> Result<Json<PromptEnhancement>, ApiError> {
    info!("Received prompt enhancement request ({} chars)", text.chars().count());

    let max_chars = state.config.limits.max_prompt_chars;
    let enhancement = forwarders::enhance_prompt(&state.bria_client, &text, max_chars)
        .await
        .map_err(|e| ApiError::new(PROMPT_FAILED, e))?;

    Ok(Json(enhancement))
}

/// Handler for `GET /image/:text`
pub async fn image_handler(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> Result<Json<ImageGeneration>, ApiError> {
    info!("Received image generation request ({} chars)", text.chars().count());

    let max_chars = state.config.limits.max_prompt_chars;
    let generation = forwarders::generate_images(&state.bria_client, &text, max_chars)
        .await
        .map_err(|e| ApiError::new(IMAGE_FAILED, e))?;

    Ok(Json(generation))
}

/// Handler for `POST /removebg`
///
/// Expects a multipart form with an `image` file field and optional
/// `preserve_partial_alpha`, `sync` and `content_moderation` text fields.
/// Only the first `image` part carrying a filename is used. An upstream
/// rejection is relayed as `{error, details}` with status 200.
pub async fn remove_background_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let max_upload_bytes = state.config.limits.max_upload_bytes;
    let invalid = |message: String| ApiError::new(REMOVEBG_FAILED, ProxyError::InvalidRequest(message));
    let read_failed = |what: &str, e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(REMOVEBG_FAILED, ProxyError::PayloadTooLarge(max_upload_bytes))
        } else {
            invalid(format!("{}: {}", what, e.body_text()))
        }
    };

    // A body that is not multipart at all cannot carry the image either
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected non-multipart removebg request: {}", e);
        invalid("Missing image file".to_string())
    })?;

    let mut image = None;
    let mut options = BackgroundRemovalOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_failed("Malformed multipart body", e))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let Some(file_name) = field.file_name().map(str::to_string) else {
                debug!("Ignoring '{}' part without a filename", IMAGE_FIELD);
                continue;
            };
            if image.is_some() {
                debug!("Ignoring additional '{}' part '{}'", IMAGE_FIELD, file_name);
                continue;
            }

            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| read_failed("Failed to read uploaded image", e))?;

            image = Some(UploadedImage {
                file_name,
                content_type,
                data,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| read_failed(&format!("Failed to read form field '{}'", name), e))?;
            if !options.apply_form_field(&name, &value) {
                debug!("Ignoring unknown form field '{}'", name);
            }
        }
    }

    let image = image.ok_or_else(|| invalid("Missing image file".to_string()))?;

    info!(
        "Received background removal request: file={}, bytes={}, options={:?}",
        image.file_name,
        image.data.len(),
        options
    );

    let outcome = forwarders::remove_background(&state.bria_client, image, options)
        .await
        .map_err(|e| ApiError::new(REMOVEBG_FAILED, e))?;

    Ok(Json(outcome.into_json()))
}

/// Handler for `GET /metrics` (Prometheus text format)
pub async fn metrics_handler() -> Result<impl IntoResponse, ProxyError> {
    let body = metrics::gather_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}
