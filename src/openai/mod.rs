mod chat;
mod core;
mod error;

pub use self::chat::{Completion, OpenAiClient};
pub use self::core::{MAX_TOKENS, TEMPERATURE, WireMessage, completion, to_wire_messages};
pub use self::error::{CompletionError, classify};
