//! Generation request parameters.
//!
//! A [`GenerationRequest`] is assembled once, validated, and then treated
//! as immutable: the submit call serializes it directly into the upstream
//! request body.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AspectRatio, OutputFormat};

/// Default safety tolerance passed to the provider (0 = strictest, 6 = most
/// permissive).
pub const DEFAULT_SAFETY_TOLERANCE: u8 = 2;

/// Highest safety tolerance the provider accepts.
pub const MAX_SAFETY_TOLERANCE: u8 = 6;

/// Parameters for one generation attempt.
///
/// Field names follow the upstream wire format; `None` fields are omitted
/// from the serialized body. The webhook fields are passed through to the
/// provider but unused by the core flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,

    /// Optional base64-encoded reference image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,

    #[serde(default)]
    pub prompt_upsampling: bool,

    #[serde(default = "default_safety_tolerance")]
    pub safety_tolerance: u8,
}

fn default_safety_tolerance() -> u8 {
    DEFAULT_SAFETY_TOLERANCE
}

impl GenerationRequest {
    /// Build a request with the core-flow defaults: PNG output, no prompt
    /// upsampling, safety tolerance 2.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            input_image: None,
            seed: None,
            aspect_ratio: None,
            output_format: Some(OutputFormat::Png),
            webhook_url: None,
            webhook_secret: None,
            prompt_upsampling: false,
            safety_tolerance: DEFAULT_SAFETY_TOLERANCE,
        }
    }

    /// Validate caller input before submission.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Prompt must not be empty".to_string(),
            ));
        }
        if self.safety_tolerance > MAX_SAFETY_TOLERANCE {
            return Err(CoreError::Validation(format!(
                "safety_tolerance must be between 0 and {MAX_SAFETY_TOLERANCE}"
            )));
        }
        Ok(())
    }
}
