use std::sync::Arc;

use anyhow::{Error, Result};

use crate::ai::chat::{Chat, Conversation, ConversationStore};
use crate::core::AppConfig;
use crate::core::Settings;
use crate::core::db::{async_db, initialize_db};
use crate::core::kv::SqliteKvStore;
use crate::openai::OpenAiClient;

pub struct AppState {
    pub chat: Chat,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(chat: Chat, config: AppConfig) -> Self {
        Self { chat, config }
    }

    /// Opens the settings store under the configured storage path and
    /// starts a fresh conversation.
    pub async fn load(config: AppConfig) -> Result<Self, Error> {
        std::fs::create_dir_all(&config.db_path)?;
        let db = async_db(&config.db_path).await?;
        db.call(|conn| {
            initialize_db(conn)?;
            Ok(())
        })
        .await?;

        let store = Arc::new(SqliteKvStore::new(&db));
        let settings = Settings::load(store, config.env_defaults.clone()).await?;
        if !settings.is_configured() {
            tracing::warn!("No API key configured. Save settings before sending messages.");
        }

        let chat = Chat::new(
            ConversationStore::new(Conversation::new()),
            Arc::new(settings),
            Arc::new(OpenAiClient::new()),
        );

        Ok(Self::new(chat, config))
    }
}
