//! Data types for the Game Catalog service
//!
//! One file per catalog entity. Each entity carries its `Resource`
//! descriptor implementation (table access, sortable columns, search
//! fields, validation rules, relations) next to the struct.

mod category;
mod platform;
mod publisher;
mod user;
mod videogame;

pub use category::Category;
pub use platform::Platform;
pub use publisher::Publisher;
pub use user::User;
pub use videogame::{EsrbRating, Videogame};

/// Result type for fallible store and server operations
pub type CatalogResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Interpret a JSON value as a boolean, accepting the 0/1 and string
/// forms that SQL-shaped clients post for flag columns.
pub(crate) fn coerce_bool(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        serde_json::Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Serde deserializer for boolean-coercible fields
pub(crate) fn boolish<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde::Deserialize;

    let value = serde_json::Value::deserialize(deserializer)?;
    coerce_bool(&value)
        .ok_or_else(|| D::Error::custom(format!("cannot interpret {} as a boolean", value)))
}
