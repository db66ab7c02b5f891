use thiserror::Error;

use crate::core::ValidationError;

/// Why a completion failed. The `Display` output is the text shown to
/// the user in the channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error(transparent)]
    AuthError(#[from] ValidationError),

    #[error(
        "GitHub tokens (ghp_*) cannot be used with the standard OpenAI API. Please use an Azure endpoint that supports GitHub tokens or provide an OpenAI API key."
    )]
    IncompatibleCredential,

    #[error(
        "Error: GitHub tokens can only be used with specific Azure endpoints configured to accept them. If you are using a GitHub token, make sure your API Base URL is set to the correct Azure endpoint."
    )]
    GitHubTokenEndpointMismatch,

    #[error("API key error: Please check that you've entered a valid API key.")]
    InvalidApiKey,

    #[error(
        "API request failed. This could be because the API endpoint is not configured to accept the provided authentication token. Please verify your API key and base URL settings."
    )]
    RequestFailed,

    #[error("Error: {}", unknown_or_default(.0))]
    Unknown(String),
}

fn unknown_or_default(message: &str) -> &str {
    if message.is_empty() {
        "Unknown error occurred. Please check your API key and connection settings."
    } else {
        message
    }
}

impl CompletionError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Maps the text of a failed request to a [`CompletionError`].
///
/// The remote API doesn't give us structured error codes we can rely
/// on across providers so this matches on the message. Keep all of the
/// string matching here.
pub fn classify(message: &str) -> CompletionError {
    if message.contains("API key") {
        if message.contains("GitHub token") {
            return CompletionError::GitHubTokenEndpointMismatch;
        }
        return CompletionError::InvalidApiKey;
    }

    if message.contains("API request failed") {
        return CompletionError::RequestFailed;
    }

    CompletionError::Unknown(message.to_string())
}
