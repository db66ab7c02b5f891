use anyhow::{Error, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ai::chat::models::{Message, Role};
use crate::ai::prompt::{NO_RESPONSE, SYSTEM_PROMPT};

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 2000;

/// A message in the shape the chat completions API expects.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: Role, content: &str) -> Self {
        WireMessage {
            role,
            content: content.to_string(),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        WireMessage::new(msg.role, &msg.content)
    }
}

/// Converts a channel history to the request format, adding the
/// default system prompt when the history has none.
pub fn to_wire_messages(history: &[Message]) -> Vec<WireMessage> {
    let mut messages: Vec<WireMessage> = history.iter().map(WireMessage::from).collect();
    if !messages.iter().any(|m| m.role == Role::System) {
        messages.insert(0, WireMessage::new(Role::System, SYSTEM_PROMPT));
    }
    messages
}

/// Pulls the text of the first choice out of a completion response.
pub fn response_content(resp: &Value) -> String {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_RESPONSE)
        .to_string()
}

fn remote_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Calls `{api_base_url}/chat/completions` and returns the raw
/// response. Unsuccessful responses become an error that includes the
/// status and the remote's own error message.
pub async fn completion(
    client: &reqwest::Client,
    messages: &[WireMessage],
    api_base_url: &str,
    api_key: &str,
    model: &str,
) -> Result<Value, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
    });
    let url = format!("{}/chat/completions", api_base_url.trim_end_matches("/"));
    tracing::debug!(
        "Requesting completion from {} using {} with {} messages",
        url,
        model,
        messages.len()
    );

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!(
            "API request failed with status {}: {}",
            status.as_u16(),
            remote_error_message(&body)
        );
    }

    Ok(response.json().await?)
}
