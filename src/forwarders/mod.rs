//! Request forwarders between the HTTP routes and the Bria API.
//!
//! Each forwarder validates its input, issues one call through
//! [`BriaClient`], and normalizes the upstream answer into the shape the
//! browser expects. They know nothing about axum, so they can be exercised
//! directly against a mock upstream.
//!
//! Unexpected upstream shapes soft-fail: the enhancer falls back to the
//! original prompt and the generator to an empty URL list. Both cases are
//! logged at `warn`.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::bria::BriaClient;
use crate::error::{ProxyError, Result};
use crate::models::bria::{extract_prompt_variation, TextToImageResponse};
use crate::models::{
    BackgroundRemovalOptions, ImageGeneration, Prompt, PromptEnhancement, RemovalOutcome,
    UploadedImage,
};
use serde_json::Value;
use tracing::{info, warn};

/// Enhance a prompt, falling back to the input when the upstream omits the
/// enhanced text.
pub async fn enhance_prompt(
    client: &BriaClient,
    text: &str,
    max_prompt_chars: usize,
) -> Result<PromptEnhancement> {
    let prompt = Prompt::parse_with_limit(text, max_prompt_chars)?;
    let body = client.enhance_prompt(prompt.as_str()).await?;

    let enhanced_prompt = enhanced_or_original(&body, prompt.as_str());
    info!(
        "Prompt enhanced ({} -> {} chars)",
        prompt.as_str().chars().count(),
        enhanced_prompt.chars().count()
    );

    Ok(PromptEnhancement {
        original_prompt: prompt.into_inner(),
        enhanced_prompt,
    })
}

/// Generate images for a prompt and return their URLs in upstream order.
pub async fn generate_images(
    client: &BriaClient,
    text: &str,
    max_prompt_chars: usize,
) -> Result<ImageGeneration> {
    let prompt = Prompt::parse_with_limit(text, max_prompt_chars)?;
    let body = client.text_to_image(prompt.as_str()).await?;

    let image_urls = image_urls(body);
    info!("Text-to-image returned {} URL(s)", image_urls.len());

    Ok(ImageGeneration {
        prompt: prompt.into_inner(),
        image_urls,
    })
}

/// Forward an uploaded image for background removal.
///
/// Empty file names and empty payloads are rejected before anything is sent.
pub async fn remove_background(
    client: &BriaClient,
    image: UploadedImage,
    options: BackgroundRemovalOptions,
) -> Result<RemovalOutcome> {
    if image.file_name.trim().is_empty() {
        return Err(ProxyError::InvalidRequest("No file selected".to_string()));
    }
    if image.data.is_empty() {
        return Err(ProxyError::InvalidRequest("Uploaded image is empty".to_string()));
    }

    client.remove_background(image, options).await
}

fn enhanced_or_original(body: &Value, original: &str) -> String {
    extract_prompt_variation(body).unwrap_or_else(|| {
        warn!("Prompt enhancer response had no usable 'prompt variations' field, returning original prompt");
        original.to_string()
    })
}

fn image_urls(body: Value) -> Vec<String> {
    match serde_json::from_value::<TextToImageResponse>(body) {
        Ok(response) => response.into_urls(),
        Err(e) => {
            warn!("Unrecognized text-to-image response shape ({}), returning no images", e);
            Vec::new()
        }
    }
}
