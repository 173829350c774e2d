// Inbound request/response bodies
// Author: kelexine (https://github.com/kelexine)

use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};

/// Default maximum prompt length accepted by the text routes, in characters.
pub const MAX_PROMPT_LENGTH: usize = 2000;

/// A prompt that has passed the length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Validate a raw prompt against [`MAX_PROMPT_LENGTH`].
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        Self::parse_with_limit(text, MAX_PROMPT_LENGTH)
    }

    /// Validate a raw prompt. Length is counted in Unicode scalar values,
    /// not bytes.
    pub fn parse_with_limit(text: impl Into<String>, max_chars: usize) -> Result<Self> {
        let text = text.into();
        if text.chars().count() > max_chars {
            return Err(ProxyError::InvalidRequest(format!(
                "Prompt too long! Max length is {} characters.",
                max_chars
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Response body of `GET /prompt/:text`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptEnhancement {
    pub original_prompt: String,
    pub enhanced_prompt: String,
}

/// Response body of `GET /image/:text`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGeneration {
    pub prompt: String,
    pub image_urls: Vec<String>,
}
