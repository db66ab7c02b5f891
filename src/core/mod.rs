pub mod config;
pub mod db;
pub mod kv;
pub mod settings;

pub use config::AppConfig;
pub use settings::{EnvDefaults, SessionConfig, Settings, ValidationError, validate};
