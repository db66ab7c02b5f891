use async_trait::async_trait;

use super::core::{completion, response_content, to_wire_messages};
use super::error::{CompletionError, classify};
use crate::ai::chat::models::Message;
use crate::core::settings::{OPENAI_HOST, SessionConfig, is_github_token, validate};

/// Anything that can turn a chat history into the next assistant
/// reply.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(
        &self,
        history: &[Message],
        config: &SessionConfig,
    ) -> Result<String, CompletionError>;
}

/// Completion client for OpenAI compatible chat completion APIs.
#[derive(Clone, Default)]
pub struct OpenAiClient {
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Completion for OpenAiClient {
    async fn complete(
        &self,
        history: &[Message],
        config: &SessionConfig,
    ) -> Result<String, CompletionError> {
        validate(&config.api_key, &config.api_base_url)?;

        // The OpenAI API accepts the request and then fails in
        // unpredictable ways so catch this before calling it
        if is_github_token(&config.api_key) && config.api_base_url.contains(OPENAI_HOST) {
            return Err(CompletionError::IncompatibleCredential);
        }

        let messages = to_wire_messages(history);
        let resp = completion(
            &self.http,
            &messages,
            &config.api_base_url,
            &config.api_key,
            &config.model,
        )
        .await
        .map_err(|e| classify(&format!("{:#}", e)))?;

        Ok(response_content(&resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::chat::models::Role;
    use crate::ai::prompt::{NO_RESPONSE, SYSTEM_PROMPT};
    use crate::core::ValidationError;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(server: &mockito::ServerGuard, api_key: &str) -> SessionConfig {
        SessionConfig::new(api_key, &format!("{}/v1", server.url()), "gpt-4o")
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "Hi"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello there"}}]}"#)
            .create();

        let client = OpenAiClient::new();
        let history = vec![Message::new(Role::User, "Hi")];
        let result = client.complete(&history, &config_for(&server, "sk-test")).await;

        mock.assert();
        assert_eq!(result, Ok("Hello there".to_string()));
    }

    #[tokio::test]
    async fn test_complete_without_content_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null}}]}"#)
            .create();

        let client = OpenAiClient::new();
        let history = vec![Message::new(Role::User, "Hi")];
        let result = client.complete(&history, &config_for(&server, "sk-test")).await;

        assert_eq!(result, Ok(NO_RESPONSE.to_string()));
    }

    #[tokio::test]
    async fn test_complete_invalid_config_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create();

        let client = OpenAiClient::new();
        let history = vec![Message::new(Role::User, "Hi")];
        let result = client.complete(&history, &config_for(&server, "")).await;

        mock.assert();
        assert_eq!(
            result,
            Err(CompletionError::AuthError(ValidationError::MissingApiKey))
        );
    }

    #[tokio::test]
    async fn test_complete_rejects_github_token_with_openai_host() {
        let client = OpenAiClient::new();
        let history = vec![Message::new(Role::User, "Hi")];

        // Passes validation because it contains the Azure host but
        // still points at the OpenAI host
        let config = SessionConfig::new(
            "ghp_abc",
            "https://models.inference.ai.azure.com.api.openai.com/v1",
            "gpt-4o",
        );
        let result = client.complete(&history, &config).await;

        assert_eq!(result, Err(CompletionError::IncompatibleCredential));
    }

    #[tokio::test]
    async fn test_complete_classifies_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Incorrect API key provided: sk-bad"}}"#)
            .create();

        let client = OpenAiClient::new();
        let history = vec![Message::new(Role::User, "Hi")];
        let result = client.complete(&history, &config_for(&server, "sk-bad")).await;

        assert_eq!(result, Err(CompletionError::InvalidApiKey));
    }

    #[tokio::test]
    async fn test_complete_classifies_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create();

        let client = OpenAiClient::new();
        let history = vec![Message::new(Role::User, "Hi")];
        let result = client.complete(&history, &config_for(&server, "sk-test")).await;

        assert_eq!(result, Err(CompletionError::RequestFailed));
    }
}
