pub mod core;
pub mod models;
pub mod store;

pub use self::core::{Chat, SendOutcome, SkipReason};
pub use models::{Channel, Message, Role};
pub use store::{Conversation, ConversationStore};
