//! kemi validation
//!
//! The rule engine behind every kemi form widget. A field declares its
//! requirements as a rule string such as `required|between:8,64|same:password`,
//! and the engine reports the first rule that fails as a user-facing message.
//!
//! ```
//! use kemi_validation::{FormValues, RuleRegistry};
//!
//! let registry = RuleRegistry::new();
//! registry.set_message("required", "Please fill this in");
//!
//! let all = FormValues::new();
//! assert_eq!(registry.validate(&"".into(), "required|email", &all), "Please fill this in");
//! assert_eq!(registry.validate(&"a@b.co".into(), "required|email", &all), "");
//! ```
//!
//! Pieces:
//! - [`RuleRegistry`]: custom rules and message overrides, one per application
//! - [`validate`]: the evaluator
//! - [`Field`] / [`FormField`]: widget adapters
//! - [`Form`]: coordinator that validates all fields on submit

pub mod engine;
pub mod field;
pub mod form;
pub mod registry;
pub mod rules;
pub mod value;

pub use engine::validate;
pub use field::{Field, FieldKind, FormField, WIDGET_REQUIRED_MESSAGE};
pub use form::{Form, FormError};
pub use registry::{CustomRule, EngineOptions, Message, RuleRegistry};
pub use rules::{parse_rules, BuiltinRule, RuleSpec};
pub use value::{FieldValue, FormValues};
