//! In-memory overlay host

use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::host::{OverlayElement, OverlayEvent, OverlayHost, OverlayKind};
use crate::interpolate::interpolate;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct NodeState {
    open: bool,
    closing: bool,
    props: Value,
}

/// One overlay element held by a [`MemoryHost`]
#[derive(Debug)]
pub struct OverlayNode {
    id: String,
    kind: OverlayKind,
    parent_id: Option<String>,
    state: Mutex<NodeState>,
    events: broadcast::Sender<OverlayEvent>,
}

impl OverlayNode {
    fn state(&self) -> std::sync::MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit a close request, as the element's close button would
    pub fn request_close(&self) {
        // No receivers simply means no manager has opened this overlay yet
        let _ = self.events.send(OverlayEvent::CloseRequested {
            kind: self.kind,
            id: self.id.clone(),
        });
    }

    /// Fill `{props.path}` placeholders in `template` from the current props
    pub fn render(&self, template: &str) -> String {
        interpolate(template, &self.state().props)
    }
}

impl OverlayElement for OverlayNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> OverlayKind {
        self.kind
    }

    fn parent_id(&self) -> Option<String> {
        self.parent_id.clone()
    }

    fn is_open(&self) -> bool {
        self.state().open
    }

    fn set_open(&self, open: bool) {
        self.state().open = open;
    }

    fn is_closing(&self) -> bool {
        self.state().closing
    }

    fn set_closing(&self, closing: bool) {
        self.state().closing = closing;
    }

    fn props(&self) -> Value {
        self.state().props.clone()
    }

    fn set_props(&self, props: Value) {
        self.state().props = props;
    }
}

/// Overlay host backed by a list of nodes in insertion order
///
/// Cloning shares the same nodes and event channel.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    nodes: Arc<RwLock<Vec<Arc<OverlayNode>>>>,
    events: broadcast::Sender<OverlayEvent>,
}

impl MemoryHost {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            nodes: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    /// Mount an overlay; an empty `parent_id` means no parent
    ///
    /// Mounting an id that already exists for `kind` replaces that node.
    pub fn insert(&self, kind: OverlayKind, id: &str, parent_id: Option<&str>) -> Arc<OverlayNode> {
        let node = Arc::new(OverlayNode {
            id: id.to_string(),
            kind,
            parent_id: parent_id.filter(|p| !p.is_empty()).map(str::to_string),
            state: Mutex::new(NodeState::default()),
            events: self.events.clone(),
        });

        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        match nodes.iter().position(|n| n.kind == kind && n.id == id) {
            Some(index) => nodes[index] = node.clone(),
            None => nodes.push(node.clone()),
        }
        node
    }

    /// Unmount an overlay; returns the removed node
    pub fn remove(&self, kind: OverlayKind, id: &str) -> Option<Arc<OverlayNode>> {
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        let index = nodes.iter().position(|n| n.kind == kind && n.id == id)?;
        Some(nodes.remove(index))
    }

    pub fn element(&self, kind: OverlayKind, id: &str) -> Option<Arc<OverlayNode>> {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|n| n.kind == kind && n.id == id)
            .cloned()
    }

    /// Emit a close request on behalf of the overlay `(kind, id)`
    pub fn request_close(&self, kind: OverlayKind, id: &str) {
        let _ = self.events.send(OverlayEvent::CloseRequested {
            kind,
            id: id.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayHost for MemoryHost {
    fn find(&self, id: &str, kinds: &[OverlayKind]) -> Option<Arc<dyn OverlayElement>> {
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);
        kinds.iter().find_map(|kind| {
            nodes
                .iter()
                .find(|n| n.kind == *kind && n.id == id)
                .map(|n| n.clone() as Arc<dyn OverlayElement>)
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events.subscribe()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
