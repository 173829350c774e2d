// Background removal inputs and outcome
// Author: kelexine (https://github.com/kelexine)

use bytes::Bytes;
use serde_json::{json, Value};

/// Content type assumed when the browser does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An uploaded image held in memory for the duration of one request.
#[derive(Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

// Payload bytes are never worth printing
impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Flags forwarded with every background removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundRemovalOptions {
    pub preserve_partial_alpha: bool,
    pub sync: bool,
    pub content_moderation: bool,
}

impl Default for BackgroundRemovalOptions {
    fn default() -> Self {
        Self {
            preserve_partial_alpha: true,
            sync: true,
            content_moderation: false,
        }
    }
}

impl BackgroundRemovalOptions {
    /// Apply a form field to the options. Unknown field names are ignored;
    /// a flag is set only when the value is `true` in any letter case.
    pub fn apply_form_field(&mut self, name: &str, value: &str) -> bool {
        let flag = value.eq_ignore_ascii_case("true");
        match name {
            "preserve_partial_alpha" => self.preserve_partial_alpha = flag,
            "sync" => self.sync = flag,
            "content_moderation" => self.content_moderation = flag,
            _ => return false,
        }
        true
    }

    /// Flags as the `(name, "true"|"false")` pairs sent upstream.
    pub fn form_fields(&self) -> [(&'static str, &'static str); 3] {
        [
            ("preserve_partial_alpha", bool_str(self.preserve_partial_alpha)),
            ("sync", bool_str(self.sync)),
            ("content_moderation", bool_str(self.content_moderation)),
        ]
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Result of a background removal call that reached the Bria API.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalOutcome {
    /// 2xx response, body passed through untouched.
    Completed(Value),
    /// Non-2xx response, kept as data rather than raised.
    Rejected { status: u16, body: String },
}

impl RemovalOutcome {
    pub fn into_json(self) -> Value {
        match self {
            RemovalOutcome::Completed(body) => body,
            RemovalOutcome::Rejected { status, body } => json!({
                "error": format!("Bria API error: {}", status),
                "details": body,
            }),
        }
    }
}
