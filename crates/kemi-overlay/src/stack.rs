//! Overlay stack manager
//!
//! One [`OverlayStack`] coordinates every overlay of one [`OverlayKind`].
//! It keeps the ids of open overlays in opening order and enforces:
//!
//! - an id appears at most once in the stack;
//! - opening an overlay without a parent first closes whatever different
//!   overlay is on top, so only one independent overlay is visible;
//! - opening an overlay with a parent suspends the parent right away, and
//!   closing the child resumes it once the close animation has finished.
//!
//! Closing is two-phase. The element gets its closing marker immediately,
//! and a task finishes the close after [`OverlayConfig::close_delay`]. That
//! task is tracked so reopening the overlay inside the window cancels it.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::host::{OverlayElement, OverlayEvent, OverlayHost, OverlayKind};

/// Length of the overlay close animation
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

/// Overlay stack configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Time between the closing marker and the overlay actually closing
    pub close_delay: Duration,

    /// Cancel a pending close when the same overlay is reopened
    ///
    /// Turning this off restores fire-and-forget timers: a close that is
    /// still pending when the overlay is reopened will close it again.
    pub cancel_pending_close_on_reopen: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
            cancel_pending_close_on_reopen: true,
        }
    }
}

/// Errors reported by [`OverlayStack::open`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("{kind} overlay with id \"{id}\" not found")]
    NotFound { kind: OverlayKind, id: String },
}

struct PendingClose {
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct StackState {
    stack: Vec<String>,
    pending: HashMap<String, PendingClose>,
    listeners: HashMap<String, JoinHandle<()>>,
    generation: u64,
}

/// Stack manager for one kind of overlay
///
/// Cloning is cheap and every clone drives the same stack.
#[derive(Clone)]
pub struct OverlayStack {
    kind: OverlayKind,
    host: Arc<dyn OverlayHost>,
    config: OverlayConfig,
    state: Arc<Mutex<StackState>>,
}

impl OverlayStack {
    pub fn new(kind: OverlayKind, host: Arc<dyn OverlayHost>, config: OverlayConfig) -> Self {
        Self {
            kind,
            host,
            config,
            state: Arc::new(Mutex::new(StackState::default())),
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn config(&self) -> OverlayConfig {
        self.config
    }

    /// Ids of open overlays, oldest first
    pub fn stack(&self) -> Vec<String> {
        self.state().stack.clone()
    }

    pub fn top(&self) -> Option<String> {
        self.state().stack.last().cloned()
    }

    /// Whether a close for `id` is waiting for its animation to finish
    pub fn is_pending_close(&self, id: &str) -> bool {
        self.state()
            .pending
            .get(id)
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Open the overlay `id`, optionally handing it new props
    ///
    /// An unknown id is logged and reported, and nothing changes.
    pub fn open(&self, id: &str, props: Option<Value>) -> Result<(), OverlayError> {
        let Some(element) = self.host.find(id, &[self.kind]) else {
            tracing::error!(kind = %self.kind, id, "overlay not found");
            return Err(OverlayError::NotFound {
                kind: self.kind,
                id: id.to_string(),
            });
        };

        match element.parent_id() {
            Some(parent_id) => {
                // Suspend, not close: the parent comes back when this one closes
                if let Some(parent) = self.host.find(&parent_id, &element.kind().search_order()) {
                    parent.set_open(false);
                    tracing::debug!(id, parent = %parent_id, "suspended parent overlay");
                }
            }
            None => {
                if let Some(current) = self.top().filter(|current| current != id) {
                    self.close(&current);
                }
            }
        }

        if self.config.cancel_pending_close_on_reopen && self.cancel_pending_close(id) {
            element.set_closing(false);
        }

        if let Some(props) = props {
            element.set_props(props);
        }
        element.set_open(true);

        {
            let mut state = self.state();
            if !state.stack.iter().any(|open| open == id) {
                state.stack.push(id.to_string());
            }
        }

        self.listen_for_close_request(id);
        tracing::debug!(kind = %self.kind, id, "overlay opened");
        Ok(())
    }

    /// Start closing the overlay `id`; returns before the close completes
    ///
    /// The element is looked up among every overlay kind, this stack's own
    /// kind first. Unknown ids are ignored.
    pub fn close(&self, id: &str) {
        let Some(element) = self.host.find(id, &self.kind.search_order()) else {
            tracing::debug!(kind = %self.kind, id, "close ignored, overlay not found");
            return;
        };

        element.set_closing(true);

        let mut state = self.state();
        if state
            .pending
            .get(id)
            .is_some_and(|pending| !pending.task.is_finished())
        {
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            drop(state);
            tracing::warn!(id, "no async runtime, closing overlay without animation delay");
            self.finish_close(id, &element, None);
            return;
        };

        state.generation += 1;
        let generation = state.generation;
        let stack = self.clone();
        let delay = self.config.close_delay;
        let owned_id = id.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            stack.finish_close(&owned_id, &element, Some(generation));
        });
        state.pending.insert(id.to_string(), PendingClose { generation, task });
    }

    /// Close every overlay currently on the stack
    pub fn close_all(&self) {
        for id in self.stack() {
            self.close(&id);
        }
    }

    /// Abort a pending close for `id`; `true` if one was cancelled
    fn cancel_pending_close(&self, id: &str) -> bool {
        let Some(pending) = self.state().pending.remove(id) else {
            return false;
        };
        if pending.task.is_finished() {
            return false;
        }
        pending.task.abort();
        tracing::debug!(kind = %self.kind, id, "cancelled pending close");
        true
    }

    /// Second phase of a close, run when the animation window ends
    ///
    /// `generation` identifies the scheduled task; a task whose entry was
    /// cancelled or replaced does nothing.
    fn finish_close(&self, id: &str, element: &Arc<dyn OverlayElement>, generation: Option<u64>) {
        {
            let mut state = self.state();
            if let Some(generation) = generation {
                match state.pending.get(id) {
                    Some(pending) if pending.generation == generation => {
                        state.pending.remove(id);
                    }
                    // Aborted entries are removed by `open`; with cancellation
                    // turned off the stale timer still owns the entry
                    Some(_) => return,
                    None if self.config.cancel_pending_close_on_reopen => return,
                    None => {}
                }
            }
            state.stack.retain(|open| open != id);
        }

        element.set_open(false);
        element.set_closing(false);

        // Re-query the parent now: it may have been unmounted meanwhile. The
        // lookup order matches the one `open` suspended it with.
        if let Some(parent_id) = element.parent_id() {
            if let Some(parent) = self.host.find(&parent_id, &element.kind().search_order()) {
                parent.set_open(true);
                tracing::debug!(id, parent = %parent_id, "resumed parent overlay");
            }
        }
        tracing::debug!(kind = %self.kind, id, "overlay closed");
    }

    /// Arm a one-shot listener that closes `id` on its close request
    fn listen_for_close_request(&self, id: &str) {
        let mut state = self.state();
        if state
            .listeners
            .get(id)
            .is_some_and(|listener| !listener.is_finished())
        {
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!(id, "no async runtime, close requests will not be observed");
            return;
        };

        // Subscribe before returning so a request sent right after `open` is seen
        let mut events = self.host.subscribe();
        let stack = self.clone();
        let own_kind = self.kind;
        let owned_id = id.to_string();
        let listener = runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(OverlayEvent::CloseRequested { kind, id })
                        if kind == own_kind && id == owned_id =>
                    {
                        stack.close(&owned_id);
                        break;
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
        state.listeners.insert(id.to_string(), listener);
    }

    fn state(&self) -> MutexGuard<'_, StackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for OverlayStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStack")
            .field("kind", &self.kind)
            .field("host", &self.host.name())
            .field("config", &self.config)
            .field("stack", &self.stack())
            .finish()
    }
}
