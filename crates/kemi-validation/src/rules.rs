// File: src/rules.rs
// Purpose: Rule-string parsing and the built-in rule set

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{FieldValue, FormValues};

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

// Password character classes; the regex crate has no lookahead, so each
// requirement is its own pattern
static LOWERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("valid pattern"));
static UPPERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid pattern"));
static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid pattern"));

const PASSWORD_MIN_LENGTH: usize = 8;

/// One `name:param,param` token of a rule string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: String,
    pub params: Vec<String>,
}

impl RuleSpec {
    /// Parse a single token. Everything before the first `:` is the name;
    /// the remainder is split on `,`.
    pub fn parse(token: &str) -> Self {
        match token.split_once(':') {
            Some((name, rest)) => RuleSpec {
                name: name.to_string(),
                params: rest.split(',').map(str::to_string).collect(),
            },
            None => RuleSpec {
                name: token.to_string(),
                params: Vec::new(),
            },
        }
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// Parse a rule string such as `required|min:3|between:2,8`
///
/// Empty tokens from leading, trailing or doubled pipes are skipped. There
/// is no escaping: parameters cannot contain `:`, `,` or `|`.
pub fn parse_rules(rules: &str) -> Vec<RuleSpec> {
    rules
        .split('|')
        .filter(|token| !token.is_empty())
        .map(RuleSpec::parse)
        .collect()
}

/// Whether `rules` contains a token named `name`
pub fn has_rule(rules: &str, name: &str) -> bool {
    parse_rules(rules).iter().any(|spec| spec.name == name)
}

/// Convert a rule parameter the way `Number(param)` does in a browser
///
/// Surrounding whitespace is ignored, an empty or missing parameter is `0`
/// or `NaN` respectively, `0x`/`0o`/`0b` prefixes select a radix, and
/// anything unparsable is `NaN`.
pub fn js_number(param: Option<&str>) -> f64 {
    let Some(raw) = param else {
        return f64::NAN;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(trimmed) {
        return n;
    }
    // Rust accepts spellings like "inf" and "nan" that a browser rejects
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned `0x1F`, `0o17` or `0b101` literal; `Some(NaN)` for a bad body
fn parse_radix_literal(literal: &str) -> Option<f64> {
    let (prefix, digits) = (literal.get(..2)?, literal.get(2..)?);
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    )
}

/// The rules every field understands without registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinRule {
    Required,
    Min,
    Max,
    Between,
    Password,
    Same,
    Different,
    Email,
}

impl BuiltinRule {
    /// Resolve a rule name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "required" => Some(BuiltinRule::Required),
            "min" => Some(BuiltinRule::Min),
            "max" => Some(BuiltinRule::Max),
            "between" => Some(BuiltinRule::Between),
            "password" => Some(BuiltinRule::Password),
            "same" => Some(BuiltinRule::Same),
            "different" => Some(BuiltinRule::Different),
            "email" => Some(BuiltinRule::Email),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRule::Required => "required",
            BuiltinRule::Min => "min",
            BuiltinRule::Max => "max",
            BuiltinRule::Between => "between",
            BuiltinRule::Password => "password",
            BuiltinRule::Same => "same",
            BuiltinRule::Different => "different",
            BuiltinRule::Email => "email",
        }
    }

    /// Numeric parameter count, for diagnostics on malformed tokens
    pub fn numeric_params(&self) -> usize {
        match self {
            BuiltinRule::Min | BuiltinRule::Max => 1,
            BuiltinRule::Between => 2,
            _ => 0,
        }
    }

    /// Field-reference parameter count, for diagnostics on malformed tokens
    pub fn field_params(&self) -> usize {
        match self {
            BuiltinRule::Same | BuiltinRule::Different => 1,
            _ => 0,
        }
    }

    /// Evaluate the rule, returning the default message on failure
    ///
    /// Size rules compare against `NaN` when a parameter is missing or
    /// malformed, and such comparisons never fail.
    pub fn check(
        &self,
        value: &FieldValue,
        params: &[String],
        all_values: &FormValues,
    ) -> Result<(), String> {
        let param = |index: usize| params.get(index).map(String::as_str);
        let shown = |index: usize| param(index).unwrap_or("undefined").to_string();

        match self {
            BuiltinRule::Required => {
                if value.is_empty_for_required() {
                    return Err("This field is required.".to_string());
                }
            }
            BuiltinRule::Min => {
                if (value.js_length() as f64) < js_number(param(0)) {
                    return Err(format!("Must be at least {} characters.", shown(0)));
                }
            }
            BuiltinRule::Max => {
                if (value.js_length() as f64) > js_number(param(0)) {
                    return Err(format!("Must not exceed {} characters.", shown(0)));
                }
            }
            BuiltinRule::Between => {
                let len = value.js_length() as f64;
                if len < js_number(param(0)) || len > js_number(param(1)) {
                    return Err(format!(
                        "Must be between {} and {} characters.",
                        shown(0),
                        shown(1)
                    ));
                }
            }
            BuiltinRule::Password => {
                if !is_strong_password(&value.to_js_string()) {
                    return Err("Password must be at least 8 characters long and include uppercase, lowercase letters, and numbers.".to_string());
                }
            }
            BuiltinRule::Same => {
                let other = FieldValue::lookup(all_values, param(0).unwrap_or("undefined"));
                if value != other {
                    return Err(format!("Values must match with {}.", shown(0)));
                }
            }
            BuiltinRule::Different => {
                let other = FieldValue::lookup(all_values, param(0).unwrap_or("undefined"));
                if value == other {
                    return Err(format!("Values must be different from {}.", shown(0)));
                }
            }
            BuiltinRule::Email => {
                if !is_valid_email(&value.to_js_string()) {
                    return Err("Please enter a valid email address.".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// 8+ UTF-16 units with an ASCII lowercase letter, uppercase letter and digit
pub fn is_strong_password(password: &str) -> bool {
    password.encode_utf16().count() >= PASSWORD_MIN_LENGTH
        && LOWERCASE_REGEX.is_match(password)
        && UPPERCASE_REGEX.is_match(password)
        && DIGIT_REGEX.is_match(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rules_orders_and_splits() {
        let rules = parse_rules("required|min:3|between:2,8");
        assert_eq!(
            rules,
            vec![
                RuleSpec { name: "required".into(), params: vec![] },
                RuleSpec { name: "min".into(), params: vec!["3".into()] },
                RuleSpec { name: "between".into(), params: vec!["2".into(), "8".into()] },
            ]
        );
    }

    #[test]
    fn test_parse_rules_skips_empty_tokens() {
        let rules = parse_rules("|required||email|");
        let names: Vec<_> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["required", "email"]);
        assert!(parse_rules("").is_empty());
    }

    #[test]
    fn test_parse_keeps_colons_after_first() {
        let spec = RuleSpec::parse("pattern:a:b");
        assert_eq!(spec.name, "pattern");
        assert_eq!(spec.params, vec!["a:b".to_string()]);
    }

    #[test]
    fn test_has_rule_matches_whole_names() {
        assert!(has_rule("min:2|required", "required"));
        assert!(!has_rule("notrequired", "required"));
    }

    #[test]
    fn test_js_number() {
        assert_eq!(js_number(Some("3")), 3.0);
        assert_eq!(js_number(Some(" 4 ")), 4.0);
        assert_eq!(js_number(Some("")), 0.0);
        assert_eq!(js_number(Some("1e2")), 100.0);
        assert!(js_number(Some("abc")).is_nan());
        assert!(js_number(Some("inf")).is_nan());
        assert!(js_number(None).is_nan());
    }

    #[test]
    fn test_js_number_radix_prefixes() {
        assert_eq!(js_number(Some("0x10")), 16.0);
        assert_eq!(js_number(Some(" 0XfF ")), 255.0);
        assert_eq!(js_number(Some("0o17")), 15.0);
        assert_eq!(js_number(Some("0b101")), 5.0);
        assert!(js_number(Some("0x")).is_nan());
        assert!(js_number(Some("0b102")).is_nan());
        // Signs are not allowed in front of a radix prefix
        assert!(js_number(Some("-0x10")).is_nan());
    }

    #[test]
    fn test_builtin_names_round_trip() {
        for name in ["required", "min", "max", "between", "password", "same", "different", "email"] {
            assert_eq!(BuiltinRule::parse(name).map(|r| r.name()), Some(name));
        }
        assert_eq!(BuiltinRule::parse("phone"), None);
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Abc12345"));
        assert!(!is_strong_password("abc12345"));
        assert!(!is_strong_password("ABC12345"));
        assert!(!is_strong_password("Abcdefgh"));
        assert!(!is_strong_password("Abc1234"));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b"));
    }
}
