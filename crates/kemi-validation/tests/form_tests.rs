//! Integration tests for forms built from kemi fields
//!
//! Covers a sign-up form end to end: touch gating on text inputs,
//! cross-field rules, widget-owned `required` checks and submission.

use kemi_validation::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::sync::Arc;

fn signup_form(registry: &Arc<RuleRegistry>) -> Form {
    let mut form = Form::new();
    form.register(Field::new("email", FieldKind::Input, "required|email", registry.clone()));
    form.register(Field::new("password", FieldKind::Input, "required|password", registry.clone()));
    form.register(Field::new("confirm", FieldKind::Input, "required|same:password", registry.clone()));
    form.register(Field::new("terms", FieldKind::Checkbox, "required", registry.clone()));
    form.register(Field::new("topics", FieldKind::TagInput, "required", registry.clone()));
    form
}

#[test]
fn test_input_is_quiet_until_blur() {
    let registry = Arc::new(RuleRegistry::new());
    let mut form = signup_form(&registry);

    assert_eq!(form.input("email", "nope"), None);
    assert_eq!(form.field("email").map(|f| f.error().to_string()), Some(String::new()));

    assert_eq!(
        form.blur("email"),
        Some("Please enter a valid email address.".to_string())
    );
    assert_eq!(form.input("email", "me@example.com"), Some(String::new()));
}

#[test]
fn test_submit_reports_every_invalid_field() {
    let registry = Arc::new(RuleRegistry::new());
    let mut form = signup_form(&registry);
    form.input("email", "me@example.com");
    form.input("password", "Secret123");
    form.input("confirm", "Secret124");

    let err = form.submit().unwrap_err();
    let FormError::Invalid { errors } = err;

    let expected: BTreeMap<String, String> = [
        ("confirm", "Values must match with password."),
        ("terms", WIDGET_REQUIRED_MESSAGE),
        ("topics", WIDGET_REQUIRED_MESSAGE),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(errors, expected);
}

#[test]
fn test_submit_marks_inputs_touched() {
    let registry = Arc::new(RuleRegistry::new());
    let mut form = signup_form(&registry);
    assert!(!form.validate());

    // After a submit attempt, typing revalidates immediately
    assert_eq!(form.input("email", "x"), Some("Please enter a valid email address.".to_string()));
}

#[test]
fn test_successful_submit_returns_values() {
    let registry = Arc::new(RuleRegistry::new());
    let mut form = signup_form(&registry);
    form.input("email", "me@example.com");
    form.input("password", "Secret123");
    form.input("confirm", "Secret123");
    form.input("terms", true);
    form.input("topics", vec!["rust"]);

    let values = form.submit().expect("form should be valid");
    assert_eq!(values.get("terms"), Some(&FieldValue::Bool(true)));
    assert_eq!(values.get("confirm"), Some(&FieldValue::from("Secret123")));
    assert!(form.errors().is_empty());
}

#[test]
fn test_custom_rule_and_message_flow_through_fields() {
    let registry = Arc::new(RuleRegistry::new());
    registry.register_rule("phone", |value, _params, _all| {
        let text = value.to_js_string();
        if text.len() == 10 && text.chars().all(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err("Invalid phone number".to_string())
        }
    });
    registry.set_message("required", "Custom!");

    let mut form = Form::new();
    form.register(Field::new("phone", FieldKind::Input, "required|phone", registry.clone()));

    assert_eq!(form.validate_field("phone"), Some("Custom!".to_string()));
    form.input("phone", "12345");
    assert_eq!(form.validate_field("phone"), Some("Invalid phone number".to_string()));
    form.input("phone", "0123456789");
    assert_eq!(form.validate_field("phone"), Some(String::new()));
}

#[test]
fn test_different_rule_across_fields() {
    let registry = Arc::new(RuleRegistry::new());
    let mut form = Form::new();
    form.register(Field::new("old", FieldKind::Input, "", registry.clone()).with_value("hunter2"));
    form.register(
        Field::new("new", FieldKind::Input, "different:old", registry.clone()).with_value("hunter2"),
    );

    assert_eq!(
        form.validate_field("new"),
        Some("Values must be different from old.".to_string())
    );
}
