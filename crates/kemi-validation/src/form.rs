// File: src/form.rs
// Purpose: Form coordinator that owns fields and validates them together

use std::collections::BTreeMap;

use thiserror::Error;

use crate::field::FormField;
use crate::value::{FieldValue, FormValues};

/// Errors surfaced by form submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// At least one field failed validation
    #[error("form has {} invalid field(s)", .errors.len())]
    Invalid { errors: BTreeMap<String, String> },
}

/// Aggregates fields in registration order
///
/// Fields are added and removed with direct calls when their widget mounts
/// and unmounts. Registering an id that is already present replaces that
/// field in place.
#[derive(Default)]
pub struct Form {
    fields: Vec<Box<dyn FormField>>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, field: impl FormField + 'static) {
        self.register_boxed(Box::new(field));
    }

    pub fn register_boxed(&mut self, field: Box<dyn FormField>) {
        match self.position(field.id()) {
            Some(index) => self.fields[index] = field,
            None => self.fields.push(field),
        }
    }

    /// Remove a field; returns it if it was registered
    pub fn unregister(&mut self, id: &str) -> Option<Box<dyn FormField>> {
        self.position(id).map(|index| self.fields.remove(index))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, id: &str) -> Option<&dyn FormField> {
        self.fields.iter().find(|f| f.id() == id).map(|f| f.as_ref())
    }

    /// Current value of every field
    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.id().to_string(), field.value()))
            .collect()
    }

    /// Validate every field for a submit; `true` when all pass
    pub fn validate(&mut self) -> bool {
        let all_values = self.values();
        let mut is_valid = true;
        for field in &mut self.fields {
            if !field.mark_touched_and_validate(&all_values).is_empty() {
                is_valid = false;
            }
        }
        is_valid
    }

    /// Validate a single field against the values of all fields
    pub fn validate_field(&mut self, id: &str) -> Option<String> {
        let all_values = self.values();
        let index = self.position(id)?;
        Some(self.fields[index].validate(&all_values))
    }

    /// Feed a new value to a field, revalidating it when the field asks to
    ///
    /// Returns the fresh error when a revalidation happened.
    pub fn input(&mut self, id: &str, value: impl Into<FieldValue>) -> Option<String> {
        let index = self.position(id)?;
        if self.fields[index].set_value(value.into()) {
            self.validate_field(id)
        } else {
            None
        }
    }

    /// Forward a blur to a field, revalidating it when the field asks to
    pub fn blur(&mut self, id: &str) -> Option<String> {
        let index = self.position(id)?;
        if self.fields[index].blur() {
            self.validate_field(id)
        } else {
            None
        }
    }

    /// Current non-empty errors by field id
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter(|field| !field.error().is_empty())
            .map(|field| (field.id().to_string(), field.error().to_string()))
            .collect()
    }

    /// Validate everything and hand back the values when the form is valid
    pub fn submit(&mut self) -> Result<FormValues, FormError> {
        if self.validate() {
            Ok(self.values())
        } else {
            let errors = self.errors();
            tracing::debug!(invalid = errors.len(), "form submission rejected");
            Err(FormError::Invalid { errors })
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id() == id)
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.fields.iter().map(|f| f.id()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldKind};
    use crate::registry::RuleRegistry;
    use std::sync::Arc;

    /// Field without touch tracking, like a third-party widget
    struct Plain {
        id: String,
        value: FieldValue,
        error: String,
    }

    impl FormField for Plain {
        fn id(&self) -> &str {
            &self.id
        }
        fn value(&self) -> FieldValue {
            self.value.clone()
        }
        fn validate(&mut self, _all_values: &FormValues) -> String {
            self.error = if self.value.is_empty_for_required() {
                "missing".to_string()
            } else {
                String::new()
            };
            self.error.clone()
        }
        fn set_value(&mut self, value: FieldValue) -> bool {
            self.value = value;
            false
        }
        fn error(&self) -> &str {
            &self.error
        }
    }

    #[test]
    fn test_register_replaces_same_id() {
        let registry = Arc::new(RuleRegistry::new());
        let mut form = Form::new();
        form.register(Field::new("a", FieldKind::Input, "", registry.clone()).with_value("1"));
        form.register(Field::new("b", FieldKind::Input, "", registry.clone()));
        form.register(Field::new("a", FieldKind::Input, "", registry).with_value("2"));

        assert_eq!(form.len(), 2);
        assert_eq!(form.values().get("a"), Some(&FieldValue::from("2")));
    }

    #[test]
    fn test_unregister() {
        let mut form = Form::new();
        form.register(Plain { id: "x".into(), value: FieldValue::Null, error: String::new() });
        assert!(form.unregister("x").is_some());
        assert!(form.unregister("x").is_none());
        assert!(form.is_empty());
    }

    #[test]
    fn test_falls_back_to_plain_validate() {
        let mut form = Form::new();
        form.register(Plain { id: "x".into(), value: FieldValue::Null, error: String::new() });
        assert!(!form.validate());
        assert_eq!(form.errors().get("x").map(String::as_str), Some("missing"));
    }

    #[test]
    fn test_unknown_field_operations() {
        let mut form = Form::new();
        assert_eq!(form.validate_field("nope"), None);
        assert_eq!(form.input("nope", "v"), None);
        assert_eq!(form.blur("nope"), None);
        assert!(form.validate());
    }
}
