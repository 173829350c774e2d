// Bria API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::BriaClient;

use zeroize::Zeroize;

/// Header the Bria API reads the token from.
pub const API_TOKEN_HEADER: &str = "api_token";

pub const PROMPT_ENHANCER_PATH: &str = "prompt_enhancer";
pub const TEXT_TO_IMAGE_PATH: &str = "text-to-image/base";
pub const REMOVE_BACKGROUND_PATH: &str = "background/remove";

/// The Bria API token, wiped from memory on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Custom Debug impl that never logs the token
impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}
