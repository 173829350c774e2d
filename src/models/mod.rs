//! Data models for the inbound routes and the upstream Bria API.
//!
//! - Inbound request/response bodies and the validated `Prompt` (`api`)
//! - Upstream Bria request/response shapes (`bria`)
//! - Uploaded images, removal flags and outcomes (`upload`)

// Author: kelexine (https://github.com/kelexine)

pub mod api;
pub mod bria;
pub mod upload;

pub use api::{ImageGeneration, Prompt, PromptEnhancement, MAX_PROMPT_LENGTH};
pub use bria::{TextToImageResponse, IMAGE_RESULT_COUNT};
pub use upload::{BackgroundRemovalOptions, RemovalOutcome, UploadedImage};
