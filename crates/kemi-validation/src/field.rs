// File: src/field.rs
// Purpose: Per-widget field adapters that feed the shared rule evaluator

use std::sync::Arc;

use crate::registry::RuleRegistry;
use crate::rules::has_rule;
use crate::value::{FieldValue, FormValues};

/// Message used by widgets that decide `required` themselves
pub const WIDGET_REQUIRED_MESSAGE: &str = "This field is required";

/// Contract between a form widget and the form that owns it
pub trait FormField: Send {
    /// Unique id of the field within its form
    fn id(&self) -> &str;

    /// Current value, as seen by sibling cross-field rules
    fn value(&self) -> FieldValue;

    /// Validate against every field's value, store and return the error
    fn validate(&mut self, all_values: &FormValues) -> String;

    /// Validate as part of a submit
    ///
    /// Fields that defer errors until the user interacted with them mark
    /// themselves touched here. Others just validate.
    fn mark_touched_and_validate(&mut self, all_values: &FormValues) -> String {
        self.validate(all_values)
    }

    /// Replace the value; returns `true` when the field wants revalidation
    fn set_value(&mut self, value: FieldValue) -> bool;

    /// Handle loss of focus; returns `true` when the field wants revalidation
    fn blur(&mut self) -> bool {
        false
    }

    /// Last error produced by `validate`, empty when valid
    fn error(&self) -> &str;
}

/// The widget a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    TextArea,
    Select,
    RadioGroup,
    CheckboxGroup,
    DatePicker,
    Slider,
    Checkbox,
    Switch,
    TagInput,
}

impl FieldKind {
    /// Text entry widgets only show errors after the first blur or submit
    pub fn tracks_touch(&self) -> bool {
        matches!(self, FieldKind::Input | FieldKind::TextArea)
    }

    /// Widget-owned `required` check; `None` defers to the shared evaluator
    pub fn violates_required(&self, value: &FieldValue) -> Option<bool> {
        match self {
            FieldKind::Checkbox | FieldKind::Switch => Some(!matches!(value, FieldValue::Bool(true))),
            FieldKind::TagInput => Some(value.as_list().map_or(true, <[FieldValue]>::is_empty)),
            _ => None,
        }
    }

    /// Value a freshly mounted widget of this kind holds
    pub fn initial_value(&self) -> FieldValue {
        match self {
            FieldKind::Checkbox | FieldKind::Switch => FieldValue::Bool(false),
            FieldKind::CheckboxGroup | FieldKind::TagInput => FieldValue::List(Vec::new()),
            FieldKind::Slider => FieldValue::Number(0.0),
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// A form field backed by the shared rule registry
#[derive(Debug)]
pub struct Field {
    id: String,
    kind: FieldKind,
    rules: String,
    value: FieldValue,
    touched: bool,
    error: String,
    max_tags: usize,
    registry: Arc<RuleRegistry>,
}

impl Field {
    pub fn new(
        id: impl Into<String>,
        kind: FieldKind,
        rules: impl Into<String>,
        registry: Arc<RuleRegistry>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            rules: rules.into(),
            value: kind.initial_value(),
            touched: false,
            error: String::new(),
            max_tags: 0,
            registry,
        }
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Cap the number of tags a tag input accepts; 0 means unlimited
    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn rules(&self) -> &str {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: impl Into<String>) {
        self.rules = rules.into();
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_required(&self) -> bool {
        has_rule(&self.rules, "required")
    }

    /// Add a tag to a tag input
    ///
    /// Returns `false` when the tag is blank, already present, or the field
    /// is at its tag limit.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        if !matches!(self.value, FieldValue::List(_)) {
            self.value = FieldValue::List(Vec::new());
        }
        let max_tags = self.max_tags;
        match &mut self.value {
            FieldValue::List(tags) => {
                if tags.iter().any(|existing| existing.as_str() == Some(tag)) {
                    return false;
                }
                if max_tags > 0 && tags.len() >= max_tags {
                    return false;
                }
                tags.push(FieldValue::from(tag));
                true
            }
            _ => false,
        }
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match &mut self.value {
            FieldValue::List(tags) => {
                let before = tags.len();
                tags.retain(|existing| existing.as_str() != Some(tag));
                tags.len() != before
            }
            _ => false,
        }
    }

    /// Check or uncheck one option of a checkbox group
    pub fn toggle_option(&mut self, option: &str, checked: bool) {
        if !matches!(self.value, FieldValue::List(_)) {
            self.value = FieldValue::List(Vec::new());
        }
        if let FieldValue::List(options) = &mut self.value {
            let present = options.iter().any(|o| o.as_str() == Some(option));
            if checked && !present {
                options.push(FieldValue::from(option));
            } else if !checked {
                options.retain(|o| o.as_str() != Some(option));
            }
        }
    }

    fn run_rules(&self, all_values: &FormValues) -> String {
        if self.rules.is_empty() {
            return String::new();
        }
        if self.is_required() {
            if let Some(true) = self.kind.violates_required(&self.value) {
                return WIDGET_REQUIRED_MESSAGE.to_string();
            }
        }
        self.registry.validate(&self.value, &self.rules, all_values)
    }
}

impl FormField for Field {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> FieldValue {
        self.value.clone()
    }

    fn validate(&mut self, all_values: &FormValues) -> String {
        self.error = self.run_rules(all_values);
        if !self.error.is_empty() {
            tracing::debug!(field = %self.id, error = %self.error, "field failed validation");
        }
        self.error.clone()
    }

    fn mark_touched_and_validate(&mut self, all_values: &FormValues) -> String {
        if self.kind.tracks_touch() {
            self.touched = true;
        }
        self.validate(all_values)
    }

    fn set_value(&mut self, value: FieldValue) -> bool {
        self.value = value;
        self.kind.tracks_touch() && self.touched
    }

    fn blur(&mut self) -> bool {
        if self.kind.tracks_touch() {
            self.touched = true;
            return true;
        }
        false
    }

    fn error(&self) -> &str {
        &self.error
    }
}
