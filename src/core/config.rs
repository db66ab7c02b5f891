use std::env;

use super::settings::EnvDefaults;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub env_defaults: EnvDefaults,
}

impl AppConfig {
    pub fn new(storage_path: &str, env_defaults: EnvDefaults) -> Self {
        Self {
            storage_path: storage_path.to_string(),
            db_path: format!("{}/db", storage_path.trim_end_matches('/')),
            env_defaults,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("CHATROOM_STORAGE_PATH").unwrap_or("./".to_string());
        Self::new(&storage_path, EnvDefaults::from_env())
    }
}
