//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{Router, body::Body};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use chatroom::ai::chat::{Chat, Conversation, ConversationStore};
use chatroom::api::AppState;
use chatroom::api::app;
use chatroom::core::kv::MemoryKvStore;
use chatroom::core::{AppConfig, EnvDefaults, Settings};
use chatroom::openai::OpenAiClient;

/// Creates a test application router backed by an in-memory settings
/// store. `env_defaults` stand in for the process environment.
pub async fn test_app(env_defaults: EnvDefaults) -> Router {
    let settings = Settings::load(Arc::new(MemoryKvStore::new()), env_defaults.clone())
        .await
        .expect("Failed to load settings");
    let chat = Chat::new(
        ConversationStore::new(Conversation::new()),
        Arc::new(settings),
        Arc::new(OpenAiClient::new()),
    );
    let config = AppConfig::new("./", env_defaults);
    app(Arc::new(RwLock::new(AppState::new(chat, config))))
}

/// Environment defaults that point completions at `base_url`.
pub fn env_defaults_for(base_url: &str, api_key: &str) -> EnvDefaults {
    EnvDefaults {
        api_key: Some(api_key.to_string()),
        api_base_url: Some(base_url.to_string()),
        model: Some("gpt-4o".to_string()),
    }
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    let body = body_to_string(body).await;
    serde_json::from_str(&body).expect("Body is not json")
}

/// Reads a full HTTP request (headers and `content-length` body) from
/// `socket`.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.expect("Failed to read request");
        if n == 0 {
            return;
        }
        data.extend_from_slice(&buf[..n]);

        let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&data[..end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= end + 4 + content_length {
            return;
        }
    }
}

/// Starts a completion endpoint that answers a single request with
/// `reply` after waiting `delay`. Returns the API base URL.
pub async fn slow_completion_server(reply: &str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get address");
    let body = serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": reply}}]
    })
    .to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        read_request(&mut socket).await;
        tokio::time::sleep(delay).await;

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        let _ = socket.shutdown().await;
    });

    format!("http://{}/v1", addr)
}
