//! Router for the settings API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use super::public;
use crate::api::state::AppState;
use crate::core::SessionConfig;
use crate::core::settings::{SUPPORTED_MODELS, SettingsError, TokenKind, validate};

type SharedState = Arc<RwLock<AppState>>;

fn unprocessable(error: String) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(public::SettingsErrorResponse { error }),
    )
        .into_response()
}

/// Get the settings currently used for completions. The API key is
/// masked.
async fn settings_get(State(state): State<SharedState>) -> Json<public::SettingsResponse> {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let resolved = chat.settings().resolve();
    Json(public::SettingsResponse::from(&resolved))
}

/// Validate and save new settings
async fn settings_save(
    State(state): State<SharedState>,
    Json(payload): Json<SessionConfig>,
) -> Result<axum::response::Response, crate::api::public::ApiError> {
    if !payload.model.is_empty() && !SUPPORTED_MODELS.contains(&payload.model.as_str()) {
        return Ok(unprocessable(format!("Unsupported model {}", payload.model)));
    }

    let chat = state.read().expect("Unable to read share state").chat.clone();
    match chat.settings().save(payload).await {
        Ok(()) => {
            let resolved = chat.settings().resolve();
            Ok(Json(public::SettingsResponse::from(&resolved)).into_response())
        }
        Err(SettingsError::Invalid(err)) => Ok(unprocessable(err.to_string())),
        Err(SettingsError::Store(err)) => Err(err.into()),
    }
}

/// Check a credential and endpoint without saving them
async fn settings_validate(
    Json(payload): Json<public::ValidateRequest>,
) -> Json<public::ValidateResponse> {
    let token_kind = TokenKind::detect(&payload.api_key);
    let result = validate(&payload.api_key, &payload.api_base_url);

    Json(public::ValidateResponse {
        valid: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
        token_kind,
        hint: token_kind.hint(),
        suggested_base_url: token_kind.suggested_base_url(),
    })
}

/// Create the settings router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(settings_get).put(settings_save))
        .route("/validate", post(settings_validate))
}
