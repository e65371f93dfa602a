//! kemi validation WASM
//!
//! WebAssembly bindings for the kemi rule engine, so browser widgets
//! evaluate rule strings with the same logic as Rust code.
//!
//! Custom rules stay on the Rust side; JavaScript can only override messages.

use std::sync::Arc;

use kemi_validation::{self as core, FieldValue, FormValues, RuleRegistry};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Rule evaluator with its own message overrides
///
/// # Example (JavaScript)
/// ```javascript
/// const validator = new Validator();
/// validator.setMessage('required', 'Please fill this in');
/// const error = validator.validate('', 'required|email', { other: 'x' });
/// ```
#[wasm_bindgen]
pub struct Validator {
    registry: Arc<RuleRegistry>,
}

#[wasm_bindgen]
impl Validator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Validator {
        Validator {
            registry: Arc::new(RuleRegistry::new()),
        }
    }

    /// First failing rule's message, or `""` when every rule passes
    ///
    /// `all_values` is a plain object of sibling field values; `undefined`
    /// and `null` mean no siblings.
    pub fn validate(&self, value: JsValue, rules: &str, all_values: JsValue) -> Result<String, JsValue> {
        let value = field_value(value)?;
        let all_values: FormValues = if all_values.is_undefined() || all_values.is_null() {
            FormValues::new()
        } else {
            serde_wasm_bindgen::from_value(all_values)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse field values: {}", e)))?
        };

        Ok(self.registry.validate(&value, rules, &all_values))
    }

    /// Override the message of a built-in rule
    #[wasm_bindgen(js_name = setMessage)]
    pub fn set_message(&self, rule: &str, text: &str) {
        self.registry.set_message(rule, text);
    }

    /// Whether the message of `rule` is overridden
    #[wasm_bindgen(js_name = hasMessage)]
    pub fn has_message(&self, rule: &str) -> bool {
        self.registry.message(rule, &[]).is_some()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

// undefined does not survive serde, it would arrive as null
fn field_value(value: JsValue) -> Result<FieldValue, JsValue> {
    if value.is_undefined() {
        return Ok(FieldValue::Undefined);
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse value: {}", e)))
}

/// Quick email validation
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    core::rules::is_valid_email(email)
}

/// Quick password strength check
#[wasm_bindgen(js_name = isStrongPassword)]
pub fn is_strong_password_js(password: &str) -> bool {
    core::rules::is_strong_password(password)
}
