//! Session settings: the credential, endpoint, and model used for
//! every completion call.
//!
//! Settings are loaded once from a [`KvStore`] at startup and only
//! change through [`Settings::save`], which validates before anything
//! is persisted. Empty fields fall back to environment defaults and
//! then to built-in defaults when resolved.
use std::env;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use super::kv::KvStore;

pub const SETTINGS_KEY: &str = "chat_settings";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const AZURE_API_BASE_URL: &str = "https://models.inference.ai.azure.com";
pub const SUPPORTED_MODELS: [&str; 4] = ["gpt-4o", "gpt-4-turbo", "gpt-4", "gpt-3.5-turbo"];

pub(crate) const GITHUB_TOKEN_PREFIX: &str = "ghp_";
pub(crate) const AZURE_INFERENCE_HOST: &str = "inference.ai.azure.com";
pub(crate) const OPENAI_HOST: &str = "api.openai.com";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
}

impl SessionConfig {
    pub fn new(api_key: &str, api_base_url: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base_url: api_base_url.to_string(),
            model: model.to_string(),
        }
    }
}

/// Optional defaults read from the process environment. Empty values
/// are treated the same as missing ones.
#[derive(Clone, Debug, Default)]
pub struct EnvDefaults {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: Option<String>,
}

impl EnvDefaults {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var("OPENAI_API_KEY"),
            api_base_url: non_empty_var("CHATROOM_API_BASE_URL"),
            model: non_empty_var("CHATROOM_MODEL"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API key is required")]
    MissingApiKey,
    #[error("API base URL is required")]
    MissingBaseUrl,
    #[error(
        "GitHub tokens can only be used with Azure endpoints (inference.ai.azure.com). Please update your API Base URL."
    )]
    IncompatibleEndpoint,
}

pub fn is_github_token(api_key: &str) -> bool {
    api_key.starts_with(GITHUB_TOKEN_PREFIX)
}

/// Checks that a credential can be used with an endpoint. The order
/// of the checks matters: a GitHub token with a missing base URL is
/// reported as an incompatible endpoint.
pub fn validate(api_key: &str, api_base_url: &str) -> Result<(), ValidationError> {
    if api_key.is_empty() {
        return Err(ValidationError::MissingApiKey);
    }
    if is_github_token(api_key) && !api_base_url.contains(AZURE_INFERENCE_HOST) {
        return Err(ValidationError::IncompatibleEndpoint);
    }
    if api_base_url.is_empty() {
        return Err(ValidationError::MissingBaseUrl);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    GitHub,
    OpenAi,
    Other,
}

impl TokenKind {
    pub fn detect(api_key: &str) -> Self {
        if is_github_token(api_key) {
            TokenKind::GitHub
        } else if api_key.starts_with("sk-") {
            TokenKind::OpenAi
        } else {
            TokenKind::Other
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            TokenKind::GitHub => {
                "GitHub token detected. GitHub tokens only work with Azure-hosted endpoints at inference.ai.azure.com."
            }
            _ => {
                "You can use either an OpenAI API key (starting with \"sk-\") or a GitHub token (starting with \"ghp_\"), but GitHub tokens only work with specific Azure endpoints."
            }
        }
    }

    pub fn suggested_base_url(&self) -> &'static str {
        match self {
            TokenKind::GitHub => AZURE_API_BASE_URL,
            _ => DEFAULT_API_BASE_URL,
        }
    }
}

/// Hides all but the edges of a secret so it can be displayed.
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// The process-wide session configuration.
pub struct Settings {
    store: Arc<dyn KvStore>,
    env_defaults: EnvDefaults,
    current: RwLock<SessionConfig>,
    // Held across persist and swap so the store and `current` agree
    save_lock: Mutex<()>,
}

impl Settings {
    /// Loads the saved record from `store`. A record that can't be
    /// parsed is logged and ignored so startup can continue with the
    /// defaults.
    pub async fn load(store: Arc<dyn KvStore>, env_defaults: EnvDefaults) -> anyhow::Result<Self> {
        let saved = match store.get(SETTINGS_KEY).await? {
            Some(raw) => serde_json::from_str::<SessionConfig>(&raw)
                .inspect_err(|e| tracing::error!("Error parsing saved settings: {}", e))
                .unwrap_or_default(),
            None => SessionConfig::default(),
        };

        Ok(Self {
            store,
            env_defaults,
            current: RwLock::new(saved),
            save_lock: Mutex::new(()),
        })
    }

    /// The effective settings used for completion calls.
    pub fn resolve(&self) -> SessionConfig {
        let current = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let env = &self.env_defaults;

        SessionConfig {
            api_key: pick(&current.api_key, env.api_key.as_deref(), ""),
            api_base_url: pick(
                &current.api_base_url,
                env.api_base_url.as_deref(),
                DEFAULT_API_BASE_URL,
            ),
            model: pick(&current.model, env.model.as_deref(), DEFAULT_MODEL),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.resolve().api_key.is_empty()
    }

    pub async fn save(&self, config: SessionConfig) -> Result<(), SettingsError> {
        validate(&config.api_key, &config.api_base_url)?;

        let _lock = self.save_lock.lock().await;
        let raw = serde_json::to_string(&config).map_err(anyhow::Error::from)?;
        self.store.set(SETTINGS_KEY, &raw).await?;

        tracing::debug!(
            "Saved settings for {} using model {}",
            config.api_base_url,
            config.model
        );
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}

fn pick(value: &str, fallback: Option<&str>, default: &str) -> String {
    if !value.is_empty() {
        return value.to_string();
    }
    fallback.unwrap_or(default).to_string()
}
