// File: src/config.rs
// Purpose: Configuration parsing from kemi.toml

use anyhow::{Context, Result};
use kemi_overlay::{MessageConfig, OverlayConfig};
use kemi_validation::EngineOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KemiConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub overlay: OverlaySection,

    #[serde(default)]
    pub message: MessageSection,
}

/// Rule engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ValidationConfig {
    /// Log rule names that are neither custom nor built in
    #[serde(default = "default_false")]
    pub warn_unknown_rules: bool,

    /// Log built-in rules called with missing or non-numeric parameters
    #[serde(default = "default_false")]
    pub warn_malformed_params: bool,

    /// Message overrides by rule name
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

/// Overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlaySection {
    /// Close animation length in milliseconds (default: 300)
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,

    #[serde(default = "default_true")]
    pub cancel_pending_close_on_reopen: bool,
}

/// Message (toast) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSection {
    /// How long a message stays up in milliseconds (default: 3000)
    #[serde(default = "default_message_duration_ms")]
    pub duration_ms: u64,
}

// Default values
fn default_close_delay_ms() -> u64 {
    300
}

fn default_message_duration_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for OverlaySection {
    fn default() -> Self {
        Self {
            close_delay_ms: default_close_delay_ms(),
            cancel_pending_close_on_reopen: true,
        }
    }
}

impl Default for MessageSection {
    fn default() -> Self {
        Self {
            duration_ms: default_message_duration_ms(),
        }
    }
}

impl ValidationConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            warn_unknown_rules: self.warn_unknown_rules,
            warn_malformed_params: self.warn_malformed_params,
        }
    }
}

impl OverlaySection {
    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            close_delay: Duration::from_millis(self.close_delay_ms),
            cancel_pending_close_on_reopen: self.cancel_pending_close_on_reopen,
        }
    }
}

impl MessageSection {
    /// Messages leave with the same delay as overlays close
    pub fn message_config(&self, overlay: &OverlaySection) -> MessageConfig {
        MessageConfig {
            default_duration: Duration::from_millis(self.duration_ms),
            exit_delay: Duration::from_millis(overlay.close_delay_ms),
        }
    }
}

impl KemiConfig {
    /// Load configuration from a kemi.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from the default path (./kemi.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("kemi.toml")
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
