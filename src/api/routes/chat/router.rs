//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use super::public;
use crate::ai::chat::{SendOutcome, SkipReason};
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Get the messages of the active channel and whether a response is
/// pending
async fn chat_state(State(state): State<SharedState>) -> Json<public::ChatStateResponse> {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let snapshot = chat.conversation().snapshot();

    Json(public::ChatStateResponse {
        channel_id: snapshot.active_channel_id().map(str::to_string),
        messages: snapshot.messages().to_vec(),
        is_loading: chat.is_loading(),
    })
}

/// Send a message to the active channel and wait for the response.
///
/// The turn runs on its own task and completes even if the client
/// disconnects.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let outcome = tokio::spawn(async move { chat.send(&payload.message).await }).await?;

    let status = match &outcome {
        SendOutcome::Replied { .. } | SendOutcome::Failed { .. } => StatusCode::OK,
        SendOutcome::Skipped {
            reason: SkipReason::Busy,
        } => StatusCode::CONFLICT,
        SendOutcome::Skipped { .. } => StatusCode::BAD_REQUEST,
    };

    Ok((status, Json(outcome)))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(chat_state).post(chat_handler))
}
