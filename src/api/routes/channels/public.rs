//! Public types for the channels API
use serde::{Deserialize, Serialize};

use crate::ai::chat::{Conversation, Message};

#[derive(Serialize, Deserialize, Debug)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub message_count: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelSummary>,
    pub active_channel_id: Option<String>,
}

impl From<&Conversation> for ChannelsResponse {
    fn from(conversation: &Conversation) -> Self {
        let channels = conversation
            .channels()
            .iter()
            .map(|c| ChannelSummary {
                id: c.id.clone(),
                name: c.name.clone(),
                message_count: c.messages.len(),
            })
            .collect();
        Self {
            channels,
            active_channel_id: conversation.active_channel_id().map(str::to_string),
        }
    }
}

#[derive(Deserialize)]
pub struct NewChannelRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct SelectChannelRequest {
    pub id: String,
}

#[derive(Serialize)]
pub struct ChannelMessagesResponse {
    pub channel_id: String,
    pub messages: Vec<Message>,
}
