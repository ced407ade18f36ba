use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Longest prompt the provider accepts.
const MAX_PROMPT_LEN: usize = 2500;

/// Text-to-video generation request.
///
/// Every field is forwarded to the provider as-is; unknown options land in
/// the flattened `extra` map so the relay stays payload-agnostic.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TextToVideoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Image-to-video generation request; `image` and `image_tail` are base64.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageToVideoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Starting frame, base64-encoded.
    pub image: String,
    /// Optional ending frame, base64-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_tail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn validate_prompt(prompt: Option<&str>) -> Result<(), AppError> {
    if let Some(p) = prompt {
        if p.chars().count() > MAX_PROMPT_LEN {
            return Err(AppError::Validation(format!(
                "Prompt must be at most {MAX_PROMPT_LEN} characters"
            )));
        }
    }
    Ok(())
}

pub fn validate_text_request(payload: &TextToVideoRequest) -> Result<(), AppError> {
    validate_prompt(payload.prompt.as_deref())
}

pub fn validate_image_request(payload: &ImageToVideoRequest) -> Result<(), AppError> {
    if payload.image.trim().is_empty() {
        return Err(AppError::Validation("A starting frame is required".into()));
    }
    validate_prompt(payload.prompt.as_deref())
}
