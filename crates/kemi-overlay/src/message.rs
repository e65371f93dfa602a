//! Transient messages (toasts)
//!
//! A [`MessageCenter`] keeps the messages currently on screen, newest last.
//! Each message dismisses itself after its duration unless the duration is
//! zero, and leaves through the same two-phase close as overlays: it is
//! marked closing at once and removed after the exit delay. The container
//! that holds the messages exists only while at least one message does.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::stack::DEFAULT_CLOSE_DELAY;

/// How long a message stays up when no duration is given
pub const DEFAULT_MESSAGE_DURATION: Duration = Duration::from_millis(3000);

/// Visual flavour of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Success,
    Error,
    Info,
    Warning,
    Loading,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Success => "success",
            MessageType::Error => "error",
            MessageType::Info => "info",
            MessageType::Warning => "warning",
            MessageType::Loading => "loading",
        };
        f.write_str(name)
    }
}

/// Message center configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageConfig {
    /// Used by `open` and the shortcuts when the caller passes `None`
    pub default_duration: Duration,

    /// Time between a message starting to leave and its removal
    pub exit_delay: Duration,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_MESSAGE_DURATION,
            exit_delay: DEFAULT_CLOSE_DELAY,
        }
    }
}

/// Handle to one opened message
pub type MessageId = u64;

/// Snapshot of a message on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageItem {
    pub id: MessageId,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub content: String,
    /// Zero means the message stays until closed
    pub duration: Duration,
    pub closing: bool,
}

struct MessageEntry {
    item: MessageItem,
    dismiss: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct MessageState {
    entries: Vec<MessageEntry>,
    next_id: MessageId,
    container: bool,
}

/// Message manager; clones share the same messages
#[derive(Clone)]
pub struct MessageCenter {
    config: MessageConfig,
    state: Arc<Mutex<MessageState>>,
}

impl MessageCenter {
    pub fn new(config: MessageConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(MessageState::default())),
        }
    }

    pub fn config(&self) -> MessageConfig {
        self.config
    }

    /// Show a message; `None` uses the configured default duration
    pub fn open(
        &self,
        kind: MessageType,
        content: impl Into<String>,
        duration: Option<Duration>,
    ) -> MessageId {
        let duration = duration.unwrap_or(self.config.default_duration);
        let mut state = self.state();

        if !state.container {
            state.container = true;
            tracing::debug!("message container mounted");
        }
        state.next_id += 1;
        let id = state.next_id;

        let dismiss = if duration.is_zero() {
            None
        } else {
            match Handle::try_current() {
                Ok(runtime) => {
                    let center = self.clone();
                    Some(runtime.spawn(async move {
                        tokio::time::sleep(duration).await;
                        center.close(id);
                    }))
                }
                Err(_) => {
                    tracing::warn!(id, "no async runtime, message will not dismiss itself");
                    None
                }
            }
        };

        state.entries.push(MessageEntry {
            item: MessageItem {
                id,
                kind,
                content: content.into(),
                duration,
                closing: false,
            },
            dismiss,
        });
        tracing::debug!(id, %kind, "message opened");
        id
    }

    pub fn success(&self, content: impl Into<String>, duration: Option<Duration>) -> MessageId {
        self.open(MessageType::Success, content, duration)
    }

    pub fn error(&self, content: impl Into<String>, duration: Option<Duration>) -> MessageId {
        self.open(MessageType::Error, content, duration)
    }

    pub fn info(&self, content: impl Into<String>, duration: Option<Duration>) -> MessageId {
        self.open(MessageType::Info, content, duration)
    }

    pub fn warning(&self, content: impl Into<String>, duration: Option<Duration>) -> MessageId {
        self.open(MessageType::Warning, content, duration)
    }

    /// Loading messages stay up until closed unless a duration is given
    pub fn loading(&self, content: impl Into<String>, duration: Option<Duration>) -> MessageId {
        self.open(MessageType::Loading, content, Some(duration.unwrap_or(Duration::ZERO)))
    }

    /// Start removing a message; `false` if it is unknown or already leaving
    pub fn close(&self, id: MessageId) -> bool {
        let mut state = self.state();
        let Some(entry) = state
            .entries
            .iter_mut()
            .find(|entry| entry.item.id == id && !entry.item.closing)
        else {
            return false;
        };

        entry.item.closing = true;
        if let Some(dismiss) = entry.dismiss.take() {
            // A manual close makes the pending auto-dismiss redundant
            dismiss.abort();
        }

        let Ok(runtime) = Handle::try_current() else {
            drop(state);
            self.remove(id);
            return true;
        };
        drop(state);

        let center = self.clone();
        let delay = self.config.exit_delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            center.remove(id);
        });
        true
    }

    /// Close every message on screen
    pub fn close_all(&self) {
        let ids: Vec<MessageId> = self.state().entries.iter().map(|e| e.item.id).collect();
        for id in ids {
            self.close(id);
        }
    }

    /// Messages on screen, oldest first, including ones still leaving
    pub fn items(&self) -> Vec<MessageItem> {
        self.state().entries.iter().map(|e| e.item.clone()).collect()
    }

    pub fn get(&self, id: MessageId) -> Option<MessageItem> {
        self.state()
            .entries
            .iter()
            .find(|e| e.item.id == id)
            .map(|e| e.item.clone())
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the message container is mounted
    pub fn has_container(&self) -> bool {
        self.state().container
    }

    fn remove(&self, id: MessageId) {
        let mut state = self.state();
        state.entries.retain(|e| e.item.id != id);
        tracing::debug!(id, "message removed");
        if state.entries.is_empty() && state.container {
            state.container = false;
            tracing::debug!("message container unmounted");
        }
    }

    fn state(&self) -> MutexGuard<'_, MessageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MessageCenter {
    fn default() -> Self {
        Self::new(MessageConfig::default())
    }
}

impl fmt::Debug for MessageCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCenter")
            .field("config", &self.config)
            .field("items", &self.items())
            .finish()
    }
}
