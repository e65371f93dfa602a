//! # kemi
//!
//! Form validation and overlay coordination for kemi widgets.
//!
//! This crate wires the component crates together from one configuration:
//!
//! - **`kemi-validation`** - rule-string engine, field adapters, form coordinator
//! - **`kemi-overlay`** - modal and drawer stack managers, message center
//!
//! ## Quick Start
//!
//! ```rust
//! use kemi::{Kemi, KemiConfig, MemoryHost, OverlayKind};
//! use std::sync::Arc;
//!
//! let config = KemiConfig::parse(r#"
//!     [validation.messages]
//!     required = "Please fill this in"
//! "#).unwrap();
//!
//! let kemi = Kemi::from_config(&config, Arc::new(MemoryHost::new()));
//! let all = kemi::FormValues::new();
//! assert_eq!(kemi.rules().validate(&"".into(), "required", &all), "Please fill this in");
//! assert_eq!(kemi.overlays().stack(OverlayKind::Modal).kind(), OverlayKind::Modal);
//! ```

pub mod config;
pub mod logging;

use std::sync::Arc;

pub use config::{KemiConfig, MessageSection, OverlaySection, ValidationConfig};

pub use kemi_overlay as overlay;
pub use kemi_validation as validation;

pub use kemi_overlay::{
    interpolate, MemoryHost, MessageCenter, MessageConfig, MessageId, MessageItem, MessageType,
    OverlayConfig, OverlayCoordinator, OverlayElement, OverlayError, OverlayEvent, OverlayHost,
    OverlayKind, OverlayNode, OverlayStack,
};
pub use kemi_validation::{
    validate, EngineOptions, Field, FieldKind, FieldValue, Form, FormError, FormField, FormValues,
    Message, RuleRegistry,
};

/// Application context: one rule registry and one overlay coordinator
#[derive(Debug, Clone)]
pub struct Kemi {
    rules: Arc<RuleRegistry>,
    overlays: OverlayCoordinator,
}

impl Kemi {
    /// Default configuration on the given host
    pub fn new(host: Arc<dyn OverlayHost>) -> Self {
        Self::from_config(&KemiConfig::default(), host)
    }

    /// Build the registry and coordinator described by `config`
    pub fn from_config(config: &KemiConfig, host: Arc<dyn OverlayHost>) -> Self {
        let rules = RuleRegistry::with_options(config.validation.engine_options());
        for (rule, text) in &config.validation.messages {
            rules.set_message(rule.as_str(), text.as_str());
        }

        tracing::debug!(
            host = host.name(),
            messages = config.validation.messages.len(),
            close_delay_ms = config.overlay.close_delay_ms,
            "kemi context created"
        );

        Self {
            rules: Arc::new(rules),
            overlays: OverlayCoordinator::with_message_config(
                host,
                config.overlay.overlay_config(),
                config.message.message_config(&config.overlay),
            ),
        }
    }

    /// Shared rule registry; clone the `Arc` into each field
    pub fn rules(&self) -> &Arc<RuleRegistry> {
        &self.rules
    }

    pub fn overlays(&self) -> &OverlayCoordinator {
        &self.overlays
    }

    /// A field bound to this context's registry
    pub fn field(&self, id: impl Into<String>, kind: FieldKind, rules: impl Into<String>) -> Field {
        Field::new(id, kind, rules, self.rules.clone())
    }
}
