//! Router for the channels API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// List all channels and the currently selected one
async fn channel_list(State(state): State<SharedState>) -> Json<public::ChannelsResponse> {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let snapshot = chat.conversation().snapshot();
    Json(public::ChannelsResponse::from(snapshot.as_ref()))
}

/// Add a new channel. Blank names and names that map to an existing
/// channel ID are ignored.
async fn channel_create(
    State(state): State<SharedState>,
    Json(payload): Json<public::NewChannelRequest>,
) -> Json<public::ChannelsResponse> {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let snapshot = chat.conversation().add_channel(&payload.name);
    Json(public::ChannelsResponse::from(snapshot.as_ref()))
}

/// Switch the active channel. An unknown ID clears the selection.
async fn channel_select(
    State(state): State<SharedState>,
    Json(payload): Json<public::SelectChannelRequest>,
) -> Json<public::ChannelsResponse> {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let snapshot = chat.conversation().select_channel(&payload.id);
    Json(public::ChannelsResponse::from(snapshot.as_ref()))
}

/// Get every message in a channel
async fn channel_messages(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let chat = state.read().expect("Unable to read share state").chat.clone();
    let snapshot = chat.conversation().snapshot();

    match snapshot.channel(&id) {
        Some(channel) => Json(public::ChannelMessagesResponse {
            channel_id: channel.id.clone(),
            messages: channel.messages.clone(),
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, format!("Channel {} not found", id)).into_response(),
    }
}

/// Create the channels router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(channel_list).post(channel_create))
        .route("/active", put(channel_select))
        .route("/{id}/messages", get(channel_messages))
}
