//! Public types for the settings API
use serde::{Deserialize, Serialize};

use crate::core::settings::{SUPPORTED_MODELS, SessionConfig, TokenKind, mask_api_key};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub token_kind: TokenKind,
    pub configured: bool,
    pub models: Vec<&'static str>,
}

impl From<&SessionConfig> for SettingsResponse {
    fn from(config: &SessionConfig) -> Self {
        Self {
            api_key: mask_api_key(&config.api_key),
            api_base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            token_kind: TokenKind::detect(&config.api_key),
            configured: !config.api_key.is_empty(),
            models: SUPPORTED_MODELS.to_vec(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_base_url: String,
}

/// Feedback for the settings form while it's being edited.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub error: Option<String>,
    pub token_kind: TokenKind,
    pub hint: &'static str,
    pub suggested_base_url: &'static str,
}

#[derive(Serialize)]
pub struct SettingsErrorResponse {
    pub error: String,
}
