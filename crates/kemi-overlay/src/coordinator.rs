// File: src/coordinator.rs
// Purpose: One drawer stack, one modal stack and the message center

use std::sync::Arc;

use crate::host::{OverlayHost, OverlayKind};
use crate::message::{MessageCenter, MessageConfig};
use crate::stack::{OverlayConfig, OverlayStack};

/// Application-wide overlay entry point
///
/// Drawers and modals keep independent stacks, but both search the same
/// host so a drawer can parent a modal and the other way round.
#[derive(Debug, Clone)]
pub struct OverlayCoordinator {
    host: Arc<dyn OverlayHost>,
    drawers: OverlayStack,
    modals: OverlayStack,
    messages: MessageCenter,
}

impl OverlayCoordinator {
    /// Messages leave with the overlays' close delay and the default duration
    pub fn new(host: Arc<dyn OverlayHost>, config: OverlayConfig) -> Self {
        let messages = MessageConfig {
            exit_delay: config.close_delay,
            ..MessageConfig::default()
        };
        Self::with_message_config(host, config, messages)
    }

    pub fn with_message_config(
        host: Arc<dyn OverlayHost>,
        config: OverlayConfig,
        messages: MessageConfig,
    ) -> Self {
        Self {
            messages: MessageCenter::new(messages),
            drawers: OverlayStack::new(OverlayKind::Drawer, host.clone(), config),
            modals: OverlayStack::new(OverlayKind::Modal, host.clone(), config),
            host,
        }
    }

    pub fn drawers(&self) -> &OverlayStack {
        &self.drawers
    }

    pub fn modals(&self) -> &OverlayStack {
        &self.modals
    }

    pub fn messages(&self) -> &MessageCenter {
        &self.messages
    }

    pub fn stack(&self, kind: OverlayKind) -> &OverlayStack {
        match kind {
            OverlayKind::Drawer => &self.drawers,
            OverlayKind::Modal => &self.modals,
        }
    }

    pub fn host(&self) -> &Arc<dyn OverlayHost> {
        &self.host
    }

    /// Close every drawer, every modal and every message
    pub fn close_everything(&self) {
        self.drawers.close_all();
        self.modals.close_all();
        self.messages.close_all();
    }
}
