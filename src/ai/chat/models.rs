//! The core models for a channel-based chat with an LLM.
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

/// A single chat message. Messages are never modified after they are
/// created.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub messages: Vec<Message>,
}

impl Channel {
    pub fn new(name: &str) -> Self {
        Channel {
            id: channel_id(name),
            name: name.to_string(),
            messages: Vec::new(),
        }
    }
}

/// Derives a channel ID from its display name e.g. "Rust Help" ->
/// "rust-help".
pub fn channel_id(name: &str) -> String {
    WHITESPACE.replace_all(&name.to_lowercase(), "-").into_owned()
}
