//! # kemi overlay
//!
//! Open/close coordination for modal and drawer overlays, plus the
//! transient message center.
//!
//! ## Example
//!
//! ```rust
//! use kemi_overlay::{MemoryHost, OverlayConfig, OverlayCoordinator, OverlayElement, OverlayKind};
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let host = MemoryHost::new();
//!     let dialog = host.insert(OverlayKind::Modal, "welcome", None);
//!     let overlays = OverlayCoordinator::new(Arc::new(host), OverlayConfig::default());
//!
//!     overlays.modals().open("welcome", Some(json!({ "name": "Ada" }))).unwrap();
//!     assert_eq!(dialog.render("Hi {props.name}"), "Hi Ada");
//!
//!     overlays.modals().close("welcome");
//!     tokio::time::sleep(Duration::from_millis(350)).await;
//!     assert!(!dialog.is_open());
//! }
//! ```

pub mod coordinator;
pub mod host;
pub mod interpolate;
pub mod message;
pub mod stack;

pub use coordinator::OverlayCoordinator;
pub use host::memory::{MemoryHost, OverlayNode};
pub use host::{OverlayElement, OverlayEvent, OverlayHost, OverlayKind};
pub use interpolate::interpolate;
pub use message::{
    MessageCenter, MessageConfig, MessageId, MessageItem, MessageType, DEFAULT_MESSAGE_DURATION,
};
pub use stack::{OverlayConfig, OverlayError, OverlayStack, DEFAULT_CLOSE_DELAY};
