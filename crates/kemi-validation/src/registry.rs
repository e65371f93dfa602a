// File: src/registry.rs
// Purpose: Custom rules and message overrides shared by every field

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::value::{FieldValue, FormValues};

/// A user-registered rule: `Err(message)` fails the field
///
/// An `Err` carrying an empty message counts as passing.
pub type CustomRule =
    Arc<dyn Fn(&FieldValue, &[String], &FormValues) -> Result<(), String> + Send + Sync>;

/// Replacement text for a rule's error message
#[derive(Clone)]
pub enum Message {
    /// Fixed text
    Text(String),
    /// Text built from the rule's parameters
    Format(Arc<dyn Fn(&[String]) -> String + Send + Sync>),
}

impl Message {
    /// Build a message from a closure over the rule parameters
    pub fn format<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        Message::Format(Arc::new(f))
    }

    pub fn render(&self, params: &[String]) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Format(f) => f(params),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Format(_) => f.write_str("Format(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

/// Development diagnostics; they never change a validation result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Warn when a rule name is neither custom nor built in
    pub warn_unknown_rules: bool,
    /// Warn when a built-in rule is missing a parameter or gets a non-number
    pub warn_malformed_params: bool,
}

/// Registry of custom rules and message overrides
///
/// Construct one per application and share it behind an `Arc`. Later
/// registrations under the same name replace earlier ones.
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, CustomRule>>,
    messages: RwLock<HashMap<String, Message>>,
    options: RwLock<EngineOptions>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options: RwLock::new(options),
            ..Self::default()
        }
    }

    /// Register a custom rule usable by name in rule strings
    ///
    /// # Example
    /// ```
    /// use kemi_validation::RuleRegistry;
    ///
    /// let registry = RuleRegistry::new();
    /// registry.register_rule("phone", |value, _params, _all| {
    ///     let digits = value.to_js_string();
    ///     if digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
    ///         Ok(())
    ///     } else {
    ///         Err("Invalid phone number".to_string())
    ///     }
    /// });
    /// assert_eq!(registry.validate(&"12345".into(), "phone", &Default::default()), "Invalid phone number");
    /// ```
    pub fn register_rule<F>(&self, name: impl Into<String>, rule: F)
    where
        F: Fn(&FieldValue, &[String], &FormValues) -> Result<(), String> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(rule = %name, "registering custom validation rule");
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(rule));
    }

    /// Override the error message of a built-in or custom rule
    pub fn set_message(&self, rule_name: impl Into<String>, message: impl Into<Message>) {
        self.messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(rule_name.into(), message.into());
    }

    /// The override message for `rule_name`, rendered with `params`
    pub fn message(&self, rule_name: &str, params: &[String]) -> Option<String> {
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        messages.get(rule_name).map(|message| message.render(params))
    }

    pub fn custom_rule(&self, name: &str) -> Option<CustomRule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn options(&self) -> EngineOptions {
        *self.options.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_options(&self, options: EngineOptions) {
        *self.options.write().unwrap_or_else(PoisonError::into_inner) = options;
    }

    /// Drop every custom rule and message override
    pub fn clear(&self) {
        self.rules.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.messages.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("RuleRegistry")
            .field("rules", &rules.keys().collect::<Vec<_>>())
            .field("messages", &*messages)
            .field("options", &self.options())
            .finish()
    }
}
