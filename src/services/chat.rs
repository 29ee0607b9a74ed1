//! Simulated support chat.
//!
//! DESIGN
//! ======
//! The dashboard's support panel is a demo: every visitor message earns a
//! canned agent reply after a short delay. The pending reply is a spawned
//! task whose handle lives on the chat instance; a newer visitor message
//! supersedes it, and dropping the chat aborts whatever is still
//! scheduled. State is owned per panel instance — nothing outlives the
//! panel and nothing is process-wide.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

const DEFAULT_REPLY_DELAY_MS: u64 = 1200;
const AGENT_REPLY: &str = "Thanks for reaching out! An advisor will follow up shortly.";

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// TYPES
// =============================================================================

/// Who authored a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    Visitor,
    Agent,
}

/// A single chat line.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub author: Author,
    pub content: String,
}

// =============================================================================
// SUPPORT CHAT
// =============================================================================

/// State for one support-chat panel instance.
pub struct SupportChat {
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    reply_delay: Duration,
    pending_reply: Option<JoinHandle<()>>,
}

impl SupportChat {
    /// Panel with the reply delay from `SUPPORT_REPLY_DELAY_MS`.
    #[must_use]
    pub fn new() -> Self {
        let delay_ms = env_parse("SUPPORT_REPLY_DELAY_MS", DEFAULT_REPLY_DELAY_MS);
        Self::with_reply_delay(Duration::from_millis(delay_ms))
    }

    #[must_use]
    pub fn with_reply_delay(reply_delay: Duration) -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            reply_delay,
            pending_reply: None,
        }
    }

    /// Record a visitor message and schedule the simulated agent reply.
    /// A still-pending reply is superseded, not stacked.
    pub fn send(&mut self, content: &str) {
        {
            let mut log = self
                .messages
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            log.push(ChatMessage { author: Author::Visitor, content: content.to_owned() });
        }

        if let Some(pending) = self.pending_reply.take() {
            pending.abort();
        }
        let messages = Arc::clone(&self.messages);
        let delay = self.reply_delay;
        self.pending_reply = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut log = messages
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            log.push(ChatMessage { author: Author::Agent, content: AGENT_REPLY.to_owned() });
        }));
    }

    /// Snapshot of the transcript.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Default for SupportChat {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SupportChat {
    fn drop(&mut self) {
        if let Some(pending) = self.pending_reply.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
