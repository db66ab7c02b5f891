use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::models::{Message, Role};
use super::store::ConversationStore;
use crate::core::Settings;
use crate::openai::Completion;

/// Sends messages from the user to the LLM and records the replies in
/// the conversation.
///
/// Only one completion call can be outstanding at a time across every
/// clone of a `Chat`. While a call is in flight further sends are
/// skipped rather than queued.
#[derive(Clone)]
pub struct Chat {
    conversation: ConversationStore,
    settings: Arc<Settings>,
    client: Arc<dyn Completion>,
    in_flight: Arc<AtomicBool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoActiveChannel,
    EmptyMessage,
    Busy,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The assistant replied.
    Replied {
        channel_id: String,
        user: Message,
        reply: Message,
    },
    /// The completion failed and the error was added to the channel
    /// in place of a reply.
    Failed {
        channel_id: String,
        user: Message,
        reply: Message,
    },
    Skipped { reason: SkipReason },
}

impl SendOutcome {
    pub fn reply(&self) -> Option<&Message> {
        match self {
            SendOutcome::Replied { reply, .. } | SendOutcome::Failed { reply, .. } => Some(reply),
            SendOutcome::Skipped { .. } => None,
        }
    }
}

// Releases the in-flight flag when dropped so it's cleared on every
// exit path, including a panic in the completion call.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Chat {
    pub fn new(
        conversation: ConversationStore,
        settings: Arc<Settings>,
        client: Arc<dyn Completion>,
    ) -> Self {
        Self {
            conversation,
            settings,
            client,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// True while a completion call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs the next turn in the active channel: appends the user
    /// message, asks the LLM for a reply, and appends the reply (or the
    /// error) to the same channel.
    pub async fn send(&self, content: &str) -> SendOutcome {
        let Some(channel_id) = self
            .conversation
            .snapshot()
            .active_channel()
            .map(|c| c.id.clone())
        else {
            return SendOutcome::Skipped {
                reason: SkipReason::NoActiveChannel,
            };
        };

        if content.trim().is_empty() {
            return SendOutcome::Skipped {
                reason: SkipReason::EmptyMessage,
            };
        }

        // Acquired before the user message is appended so two sends
        // racing each other can't both add a message
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Ignoring message while a response is pending");
            return SendOutcome::Skipped {
                reason: SkipReason::Busy,
            };
        };

        let user = Message::new(Role::User, content);
        let snapshot = self.conversation.append_message(&channel_id, user.clone());
        let history = snapshot
            .channel(&channel_id)
            .map(|c| c.messages.clone())
            .unwrap_or_default();

        let config = self.settings.resolve();
        tracing::debug!(
            "Sending {} messages from #{} to {}",
            history.len(),
            channel_id,
            config.model
        );

        match self.client.complete(&history, &config).await {
            Ok(text) => {
                let reply = Message::new(Role::Assistant, &text);
                self.conversation.append_message(&channel_id, reply.clone());
                SendOutcome::Replied {
                    channel_id,
                    user,
                    reply,
                }
            }
            Err(err) => {
                tracing::error!("Error generating AI response: {:?}", err);
                let reply = Message::new(Role::Assistant, &err.user_message());
                self.conversation.append_message(&channel_id, reply.clone());
                SendOutcome::Failed {
                    channel_id,
                    user,
                    reply,
                }
            }
        }
    }
}
