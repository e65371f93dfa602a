//! Overlay hosts: where overlay elements live
//!
//! The stack manager never owns overlays. It finds them through an
//! [`OverlayHost`] by id, flips their flags, and listens for their close
//! requests. A browser integration implements the host over the DOM; the
//! in-process [`memory::MemoryHost`] is used by native callers and tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

pub mod memory;

/// Family of overlays sharing one stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Drawer,
    Modal,
}

impl OverlayKind {
    /// Every kind
    pub const ALL: [OverlayKind; 2] = [OverlayKind::Drawer, OverlayKind::Modal];

    /// Custom element tag of this kind
    pub fn tag_name(&self) -> &'static str {
        match self {
            OverlayKind::Drawer => "ui-drawer",
            OverlayKind::Modal => "ui-modal",
        }
    }

    /// `self` first, then the remaining kinds
    pub fn search_order(&self) -> [OverlayKind; 2] {
        match self {
            OverlayKind::Drawer => [OverlayKind::Drawer, OverlayKind::Modal],
            OverlayKind::Modal => [OverlayKind::Modal, OverlayKind::Drawer],
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayKind::Drawer => f.write_str("drawer"),
            OverlayKind::Modal => f.write_str("modal"),
        }
    }
}

/// Notifications emitted by overlay elements
///
/// Serialized as `{"type": "overlay-close", "kind": "modal", "id": "..."}`,
/// the shape browser hosts dispatch. Ids are only unique within one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OverlayEvent {
    /// The user asked the overlay to close (close button, backdrop click)
    #[serde(rename = "overlay-close")]
    CloseRequested { kind: OverlayKind, id: String },
}

/// Capabilities the stack manager needs from one overlay element
pub trait OverlayElement: Send + Sync {
    fn id(&self) -> &str;

    fn kind(&self) -> OverlayKind;

    /// Id of the overlay this one suspends while open, if any
    fn parent_id(&self) -> Option<String>;

    fn is_open(&self) -> bool;

    fn set_open(&self, open: bool);

    /// Whether the close animation marker is set
    fn is_closing(&self) -> bool;

    fn set_closing(&self, closing: bool);

    fn props(&self) -> Value;

    /// Hand content-interpolation data to the element
    fn set_props(&self, props: Value);
}

/// Lookup and event source for overlay elements
pub trait OverlayHost: Send + Sync {
    /// Find the element registered under `id`, trying `kinds` in order
    fn find(&self, id: &str, kinds: &[OverlayKind]) -> Option<Arc<dyn OverlayElement>>;

    /// Subscribe to close requests from every element of this host
    fn subscribe(&self) -> broadcast::Receiver<OverlayEvent>;

    /// Get host backend name
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn OverlayHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverlayHost({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(OverlayKind::Drawer, "ui-drawer", "drawer")]
    #[case(OverlayKind::Modal, "ui-modal", "modal")]
    fn test_kind_names(#[case] kind: OverlayKind, #[case] tag: &str, #[case] name: &str) {
        assert_eq!(kind.tag_name(), tag);
        assert_eq!(kind.to_string(), name);
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(name));
        assert_eq!(kind.search_order()[0], kind);
    }

    #[test]
    fn test_close_event_wire_shape() {
        let event: OverlayEvent =
            serde_json::from_value(json!({ "type": "overlay-close", "kind": "drawer", "id": "cart" }))
                .unwrap();
        assert_eq!(
            event,
            OverlayEvent::CloseRequested { kind: OverlayKind::Drawer, id: "cart".to_string() }
        );
    }
}
