//! End-to-end tests: configuration, forms and overlays through one context

use kemi::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn context(toml: &str) -> (MemoryHost, Kemi) {
    let host = MemoryHost::new();
    let config = KemiConfig::parse(toml).unwrap();
    let kemi = Kemi::from_config(&config, Arc::new(host.clone()));
    (host, kemi)
}

#[test]
fn test_config_messages_reach_fields() {
    let (_, kemi) = context(
        r#"
        [validation.messages]
        email = "Use a work email"
        "#,
    );

    let mut form = Form::new();
    form.register(kemi.field("email", FieldKind::Input, "required|email").with_value("nope"));

    let err = form.submit().unwrap_err();
    let FormError::Invalid { errors } = err;
    assert_eq!(errors.get("email").map(String::as_str), Some("Use a work email"));
}

#[test]
fn test_custom_rule_shared_across_fields() {
    let (_, kemi) = context("");
    kemi.rules().register_rule("even", |value, _, _| {
        let n: f64 = value.to_js_string().parse().unwrap_or(f64::NAN);
        if n % 2.0 == 0.0 {
            Ok(())
        } else {
            Err("Must be even".to_string())
        }
    });

    let mut form = Form::new();
    form.register(kemi.field("a", FieldKind::Slider, "even").with_value(3));
    form.register(kemi.field("b", FieldKind::Select, "even").with_value("4"));

    assert!(!form.validate());
    assert_eq!(form.errors().len(), 1);
    assert_eq!(form.errors().get("a").map(String::as_str), Some("Must be even"));
}

#[tokio::test(start_paused = true)]
async fn test_configured_close_delay() {
    let (host, kemi) = context("[overlay]\nclose_delay_ms = 50\n");
    let drawer = host.insert(OverlayKind::Drawer, "cart", None);

    kemi.overlays().drawers().open("cart", Some(json!({ "count": 2 }))).unwrap();
    assert_eq!(drawer.render("{props.count} items"), "2 items");

    kemi.overlays().drawers().close("cart");
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!drawer.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_modal_form_submit_then_close() {
    let (host, kemi) = context("");
    let modal = host.insert(OverlayKind::Modal, "signup", None);
    kemi.overlays().modals().open("signup", None).unwrap();

    let mut form = Form::new();
    form.register(kemi.field("password", FieldKind::Input, "required|min:8"));
    form.register(kemi.field("confirm", FieldKind::Input, "required|same:password"));

    form.input("password", "hunter22");
    form.input("confirm", "hunter2");
    assert!(form.submit().is_err());
    assert!(modal.is_open());

    form.input("confirm", "hunter22");
    let values = form.submit().unwrap();
    assert_eq!(values.get("confirm"), Some(&FieldValue::from("hunter22")));

    kemi.overlays().close_everything();
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(!modal.is_open());
    assert!(kemi.overlays().modals().stack().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_configured_message_timing() {
    let (_, kemi) = context("[overlay]\nclose_delay_ms = 100\n\n[message]\nduration_ms = 1000\n");
    let messages = kemi.overlays().messages();

    let id = messages.success("Saved", None);
    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(messages.get(id).map(|m| m.closing), Some(true));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(messages.is_empty());
    assert!(!messages.has_container());
}
