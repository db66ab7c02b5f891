//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::chat::Message;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// The active channel as the chat view sees it.
#[derive(Serialize)]
pub struct ChatStateResponse {
    pub channel_id: Option<String>,
    pub messages: Vec<Message>,
    pub is_loading: bool,
}
