// Bria API wire types
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of images requested per text-to-image call.
pub const IMAGE_RESULT_COUNT: u32 = 1;

/// Field of the prompt enhancer response that carries the enhanced text.
pub const PROMPT_VARIATIONS_FIELD: &str = "prompt variations";

/// Request body for `POST /prompt_enhancer`
#[derive(Debug, Clone, Serialize)]
pub struct EnhancePromptRequest<'a> {
    pub prompt: &'a str,
}

/// Request body for `POST /text-to-image/base/{model_version}`
#[derive(Debug, Clone, Serialize)]
pub struct TextToImageRequest<'a> {
    pub prompt: &'a str,
    pub num_results: u32,
    pub sync: bool,
}

impl<'a> TextToImageRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            num_results: IMAGE_RESULT_COUNT,
            sync: true,
        }
    }
}

/// Shapes the text-to-image endpoint is known to answer with.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextToImageResponse {
    /// `{"result": [{"urls": [...]}, ...]}`
    Nested { result: Vec<ImageResult> },
    /// `{"urls": [...]}`
    Flat { urls: Vec<String> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageResult {
    #[serde(default)]
    pub urls: Vec<String>,
}

impl TextToImageResponse {
    /// Flatten into one ordered list of URLs.
    pub fn into_urls(self) -> Vec<String> {
        match self {
            TextToImageResponse::Nested { result } => {
                result.into_iter().flat_map(|item| item.urls).collect()
            }
            TextToImageResponse::Flat { urls } => urls,
        }
    }
}

/// Pull the enhanced prompt out of a prompt enhancer response.
///
/// Accepts a string, or a list whose first entry is a string.
pub fn extract_prompt_variation(body: &Value) -> Option<String> {
    match body.get(PROMPT_VARIATIONS_FIELD)? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => items.first()?.as_str().map(str::to_string),
        _ => None,
    }
}
