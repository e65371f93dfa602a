//! Rule evaluator
//!
//! Evaluates a rule string against one value and the values of every sibling
//! field. Rules run in order and evaluation stops at the first failure, so a
//! field only ever surfaces one message at a time.
//!
//! Precedence for each token:
//! 1. a custom rule registered under the token's name,
//! 2. a built-in rule,
//! 3. nothing: unknown names are ignored and the token passes.

use crate::registry::RuleRegistry;
use crate::rules::{js_number, parse_rules, BuiltinRule, RuleSpec};
use crate::value::{FieldValue, FormValues};

/// Validate `value` against `rules`, returning the first error or `""`
///
/// # Example
/// ```
/// use kemi_validation::{validate, FormValues, RuleRegistry};
///
/// let registry = RuleRegistry::new();
/// let all = FormValues::new();
/// assert_eq!(validate(&registry, &"".into(), "required|min:3", &all), "This field is required.");
/// assert_eq!(validate(&registry, &"abc".into(), "required|min:3", &all), "");
/// ```
pub fn validate(
    registry: &RuleRegistry,
    value: &FieldValue,
    rules: &str,
    all_values: &FormValues,
) -> String {
    for spec in parse_rules(rules) {
        if let Err(message) = check_rule(registry, &spec, value, all_values) {
            if !message.is_empty() {
                return message;
            }
        }
    }
    String::new()
}

/// Evaluate one parsed token, applying any message override on failure
fn check_rule(
    registry: &RuleRegistry,
    spec: &RuleSpec,
    value: &FieldValue,
    all_values: &FormValues,
) -> Result<(), String> {
    if let Some(rule) = registry.custom_rule(&spec.name) {
        return rule(value, &spec.params, all_values).map_err(|error| {
            if error.is_empty() {
                error
            } else {
                registry.message(&spec.name, &spec.params).unwrap_or(error)
            }
        });
    }

    let Some(builtin) = BuiltinRule::parse(&spec.name) else {
        if registry.options().warn_unknown_rules {
            tracing::warn!(rule = %spec.name, "unknown validation rule ignored");
        }
        return Ok(());
    };

    if registry.options().warn_malformed_params {
        warn_on_malformed_params(builtin, spec);
    }

    builtin
        .check(value, &spec.params, all_values)
        .map_err(|default| registry.message(&spec.name, &spec.params).unwrap_or(default))
}

fn warn_on_malformed_params(rule: BuiltinRule, spec: &RuleSpec) {
    for index in 0..rule.numeric_params() {
        if js_number(spec.param(index)).is_nan() {
            tracing::warn!(
                rule = rule.name(),
                param = ?spec.param(index),
                "numeric rule parameter is missing or not a number; the rule will always pass"
            );
        }
    }
    for index in 0..rule.field_params() {
        if spec.param(index).map_or(true, str::is_empty) {
            tracing::warn!(rule = rule.name(), "rule is missing the field id to compare against");
        }
    }
}

impl RuleRegistry {
    /// Validate against this registry's custom rules and messages
    pub fn validate(&self, value: &FieldValue, rules: &str, all_values: &FormValues) -> String {
        validate(self, value, rules, all_values)
    }
}
