// File: src/interpolate.rs
// Purpose: Fill {props.path} placeholders in overlay content

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

// Placeholder syntax: {props.user.name}
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{props\.([^}]+)\}").expect("placeholder pattern is valid"));

/// Replace every `{props.a.b}` in `template` with the value at `a.b`
///
/// Missing paths and nulls render as nothing, strings render as-is, and
/// any other JSON value renders as its JSON text.
///
/// ```
/// use kemi_overlay::interpolate;
/// use serde_json::json;
///
/// let props = json!({ "user": { "name": "Ada" }, "count": 3 });
/// assert_eq!(interpolate("{props.user.name} has {props.count} items", &props), "Ada has 3 items");
/// assert_eq!(interpolate("[{props.missing}]", &props), "[]");
/// ```
pub fn interpolate(template: &str, props: &Value) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| render(lookup(props, &caps[1])))
        .into_owned()
}

/// Walk a dotted path through nested objects
pub fn lookup<'a>(props: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(props, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
