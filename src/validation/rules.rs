//! Field rule checks
//!
//! A rule is data: a check variant plus the reason reported when it
//! fails. Checks see the raw JSON value (or its absence) so the reasons
//! can speak the caller's language instead of serde's.

use serde_json::Value;

use crate::types::coerce_bool;

/// One field check with a fixed failure reason
#[derive(Debug, Clone)]
pub enum Check {
    /// A string with at least one non-whitespace character
    NonEmptyString,
    /// Any non-null, non-empty value
    NonEmpty,
    /// A JSON integer
    Integer,
    /// A JSON integer within the inclusive range
    IntRange(i64, i64),
    /// A JSON number within the inclusive range
    NumRange(i64, i64),
    /// Coercible to a boolean (true/false, 0/1, "0"/"1")
    Boolish,
    /// An http(s) URL, or null/absent
    UrlOrNull,
    /// A structurally plausible email address
    Email,
    /// Letters, digits, and spaces only
    AlnumSpaces,
    /// One of a fixed set of string labels
    OneOf(&'static [&'static str]),
}

impl Check {
    /// Apply the check; `Err` carries the user-facing reason.
    pub fn apply(&self, value: Option<&Value>) -> Result<(), String> {
        // Absence is only acceptable for rules that allow null.
        let value = match value {
            Some(v) => v,
            None if matches!(self, Check::UrlOrNull) => return Ok(()),
            None => return Err(self.reason()),
        };

        let ok = match self {
            Check::NonEmptyString => value.as_str().map(|s| !s.trim().is_empty()).unwrap_or(false),
            Check::NonEmpty => match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                Value::Object(map) => !map.is_empty(),
                _ => true,
            },
            Check::Integer => value.as_i64().is_some(),
            Check::IntRange(lo, hi) => value
                .as_i64()
                .map(|n| n >= *lo && n <= *hi)
                .unwrap_or(false),
            Check::NumRange(lo, hi) => value
                .as_f64()
                .map(|n| n >= *lo as f64 && n <= *hi as f64)
                .unwrap_or(false),
            Check::Boolish => coerce_bool(value).is_some(),
            Check::UrlOrNull => {
                matches!(value, Value::Null) || value.as_str().map(is_url).unwrap_or(false)
            }
            Check::Email => value.as_str().map(is_email).unwrap_or(false),
            Check::AlnumSpaces => value
                .as_str()
                .map(|s| {
                    !s.trim().is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == ' ')
                })
                .unwrap_or(false),
            Check::OneOf(labels) => value
                .as_str()
                .map(|s| labels.contains(&s))
                .unwrap_or(false),
        };

        if ok {
            Ok(())
        } else {
            Err(self.reason())
        }
    }

    fn reason(&self) -> String {
        match self {
            Check::NonEmptyString => "must be a non-empty string".to_string(),
            Check::NonEmpty => "must not be empty".to_string(),
            Check::Integer => "must be an integer".to_string(),
            Check::IntRange(lo, hi) => {
                format!("must be an integer between {} and {}", lo, hi)
            }
            Check::NumRange(lo, hi) => {
                format!("must be a number between {} and {}", lo, hi)
            }
            Check::Boolish => "must be boolean-coercible".to_string(),
            Check::UrlOrNull => "must be a valid URL or absent".to_string(),
            Check::Email => "must be a valid email address".to_string(),
            Check::AlnumSpaces => "must contain only letters, digits, and spaces".to_string(),
            Check::OneOf(labels) => format!("must be one of: {}", labels.join(", ")),
        }
    }
}

fn is_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"));
    match rest {
        Some(host) => !host.is_empty() && !host.starts_with('/') && !s.contains(char::is_whitespace),
        None => false,
    }
}

fn is_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
