//! Field validation engine
//!
//! Each entity declares an ordered list of `(field, rule)` pairs. Every
//! rule runs - failures accumulate into a per-call map of one reason per
//! field, which doubles as the user-facing error payload. Nothing is
//! raised as control flow and no state outlives the call.

mod rules;

pub use rules::Check;

use std::collections::BTreeMap;

use serde_json::Value;

/// Accumulated failures: field name -> human-readable reason
pub type ValidationErrors = BTreeMap<String, String>;

/// One field rule in an entity's ordered rule list
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub check: Check,
}

impl FieldRule {
    pub fn new(field: &'static str, check: Check) -> Self {
        Self { field, check }
    }
}

/// Run every rule against the request data.
///
/// A field's value is resolved preferring the path parameter (when the
/// rule names the primary key and the route carries an id) over the body.
/// All rules run regardless of earlier failures so the caller sees every
/// failing field at once; success is an empty map.
pub fn validate(
    rules: &[FieldRule],
    path_id: Option<(&str, i64)>,
    body: &Value,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for rule in rules {
        let path_value = path_id
            .filter(|(field, _)| *field == rule.field)
            .map(|(_, id)| Value::from(id));
        let value = path_value.as_ref().or_else(|| body.get(rule.field));

        if let Err(reason) = rule.check.apply(value) {
            errors.insert(rule.field.to_string(), reason);
        }
    }

    errors
}
