//! Fixed prompts and canned assistant text.

/// Prepended to every completion request that doesn't already carry a
/// system message.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant in a Discord-like chat interface. Be conversational, helpful, and concise in your responses.";

/// The first message in the default channel.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Used when the completion succeeds but carries no content.
pub const NO_RESPONSE: &str = "Sorry, I could not generate a response.";
