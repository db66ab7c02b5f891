//! Channels and their message history.
//!
//! A [`Conversation`] is an immutable value. Every operation returns a
//! new snapshot and the [`ConversationStore`] swaps the shared
//! snapshot in one step, so anyone holding an older snapshot never
//! sees it change underneath them.
use std::sync::{Arc, PoisonError, RwLock};

use super::models::{Channel, Message, Role, channel_id};
use crate::ai::prompt::WELCOME_MESSAGE;

pub const DEFAULT_CHANNEL: &str = "general";

#[derive(Clone, Debug)]
pub struct Conversation {
    channels: Vec<Channel>,
    active_channel_id: Option<String>,
}

impl Conversation {
    /// Starts a conversation with a single "general" channel, selected
    /// and seeded with a welcome message from the assistant.
    pub fn new() -> Self {
        let mut general = Channel::new(DEFAULT_CHANNEL);
        general
            .messages
            .push(Message::new(Role::Assistant, WELCOME_MESSAGE));

        Self {
            active_channel_id: Some(general.id.clone()),
            channels: vec![general],
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn active_channel_id(&self) -> Option<&str> {
        self.active_channel_id.as_deref()
    }

    pub fn active_channel(&self) -> Option<&Channel> {
        self.active_channel_id
            .as_deref()
            .and_then(|id| self.channel(id))
    }

    /// Messages of the active channel, or nothing when no channel is
    /// selected.
    pub fn messages(&self) -> &[Message] {
        self.active_channel()
            .map(|c| c.messages.as_slice())
            .unwrap_or_default()
    }

    pub fn add_channel(&self, name: &str) -> Self {
        if name.trim().is_empty() {
            return self.clone();
        }

        let id = channel_id(name);
        if self.channel(&id).is_some() {
            tracing::warn!("Ignoring new channel {}: id {} already exists", name, id);
            return self.clone();
        }

        let mut next = self.clone();
        next.channels.push(Channel::new(name));
        next
    }

    pub fn select_channel(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.active_channel_id = self.channel(id).map(|c| c.id.clone());
        next
    }

    pub fn append_message(&self, channel_id: &str, message: Message) -> Self {
        let mut next = self.clone();
        match next.channels.iter_mut().find(|c| c.id == channel_id) {
            Some(channel) => channel.messages.push(message),
            None => tracing::warn!("Dropping message for unknown channel {}", channel_id),
        }
        next
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the current conversation snapshot.
#[derive(Clone, Default)]
pub struct ConversationStore {
    current: Arc<RwLock<Arc<Conversation>>>,
}

impl ConversationStore {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(conversation))),
        }
    }

    pub fn snapshot(&self) -> Arc<Conversation> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `f` to the current snapshot and stores the result.
    /// Returns the new snapshot.
    pub fn update<F>(&self, f: F) -> Arc<Conversation>
    where
        F: FnOnce(&Conversation) -> Conversation,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(f(&current));
        *current = Arc::clone(&next);
        next
    }

    pub fn add_channel(&self, name: &str) -> Arc<Conversation> {
        self.update(|c| c.add_channel(name))
    }

    pub fn select_channel(&self, id: &str) -> Arc<Conversation> {
        self.update(|c| c.select_channel(id))
    }

    pub fn append_message(&self, channel_id: &str, message: Message) -> Arc<Conversation> {
        self.update(|c| c.append_message(channel_id, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_has_general_with_welcome() {
        let conversation = Conversation::new();
        assert_eq!(conversation.channels().len(), 1);

        let general = conversation.active_channel().unwrap();
        assert_eq!(general.id, "general");
        assert_eq!(general.name, "general");
        assert_eq!(general.messages.len(), 1);
        assert_eq!(general.messages[0].role, Role::Assistant);
        assert_eq!(general.messages[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn test_add_channel_appends_without_selecting() {
        let conversation = Conversation::new().add_channel("Rust Help");
        let ids: Vec<&str> = conversation.channels().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["general", "rust-help"]);
        assert_eq!(conversation.active_channel().unwrap().id, "general");
        assert!(conversation.channel("rust-help").unwrap().messages.is_empty());
    }

    #[test]
    fn test_add_channel_ignores_blank_names() {
        let conversation = Conversation::new();
        for name in ["", "   ", "\t\n"] {
            assert_eq!(conversation.add_channel(name).channels().len(), 1);
        }
    }

    #[test]
    fn test_add_channel_keeps_ids_unique() {
        let conversation = Conversation::new()
            .add_channel("Random")
            .add_channel("random")
            .add_channel("General");
        assert_eq!(conversation.channels().len(), 2);
    }

    #[test]
    fn test_select_channel() {
        let conversation = Conversation::new().add_channel("random");
        let selected = conversation.select_channel("random");
        assert_eq!(selected.active_channel().unwrap().id, "random");

        let missing = selected.select_channel("does-not-exist");
        assert!(missing.active_channel().is_none());
        assert!(missing.messages().is_empty());
    }

    #[test]
    fn test_append_message_is_visible_on_active_channel() {
        let conversation = Conversation::new();
        let next = conversation.append_message("general", Message::new(Role::User, "Hi"));

        assert_eq!(next.messages().len(), 2);
        assert_eq!(next.messages()[1].content, "Hi");
        // The old snapshot is untouched
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn test_append_message_to_unknown_channel_is_noop() {
        let conversation = Conversation::new().append_message("nope", Message::new(Role::User, "Hi"));
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn test_store_snapshots_are_stable() {
        let store = ConversationStore::new(Conversation::new());
        let before = store.snapshot();

        store.add_channel("random");
        store.append_message("general", Message::new(Role::User, "Hi"));

        assert_eq!(before.channels().len(), 1);
        assert_eq!(before.messages().len(), 1);

        let after = store.snapshot();
        assert_eq!(after.channels().len(), 2);
        assert_eq!(after.messages().len(), 2);
    }

    #[test]
    fn test_store_select_channel() {
        let store = ConversationStore::new(Conversation::new());
        store.add_channel("random");
        let snapshot = store.select_channel("random");
        assert_eq!(snapshot.active_channel().unwrap().id, "random");
        assert_eq!(store.snapshot().active_channel().unwrap().id, "random");
    }
}
