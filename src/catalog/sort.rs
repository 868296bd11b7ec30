//! Sort-key parsing
//!
//! The `sort` query parameter is a comma-separated list of
//! `column[:direction]` keys, optionally wrapped in brackets:
//! `sort=[release_year:desc,platform_name]`. Key order matters - the
//! first key is the primary sort. Malformed keys are a client error;
//! the parser never guesses.

use std::fmt;

/// Sort direction for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `column:direction` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Parse failure for a sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    EmptyKey,
    MalformedKey(String),
    UnknownDirection(String),
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::EmptyKey => write!(f, "sort contains an empty key"),
            SortError::MalformedKey(token) => {
                write!(f, "sort key '{}' is malformed", token)
            }
            SortError::UnknownDirection(direction) => {
                write!(f, "sort direction '{}' is not 'asc' or 'desc'", direction)
            }
        }
    }
}

impl std::error::Error for SortError {}

/// A comparable column value for in-memory ordering
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

/// Parse a sort specification into an ordered key list.
///
/// Whitespace and the optional surrounding brackets are stripped; a key
/// without a direction sorts ascending. A repeated column keeps its first
/// position but takes the last direction given. An empty specification
/// parses to an empty list.
pub fn parse_sort_keys(spec: &str) -> Result<Vec<SortKey>, SortError> {
    let cleaned: String = spec.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.strip_prefix('[').unwrap_or(&cleaned);
    let cleaned = cleaned.strip_suffix(']').unwrap_or(cleaned);

    if cleaned.is_empty() {
        return Ok(Vec::new());
    }

    let mut keys: Vec<SortKey> = Vec::new();
    for token in cleaned.split(',') {
        let parts: Vec<&str> = token.split(':').collect();
        let (column, direction) = match parts.as_slice() {
            [column] => (*column, SortDirection::Asc),
            [column, "asc"] => (*column, SortDirection::Asc),
            [column, "desc"] => (*column, SortDirection::Desc),
            [_, direction] => {
                return Err(SortError::UnknownDirection((*direction).to_string()));
            }
            _ => return Err(SortError::MalformedKey(token.to_string())),
        };

        if column.is_empty() {
            return Err(SortError::EmptyKey);
        }

        match keys.iter_mut().find(|key| key.column == column) {
            Some(existing) => existing.direction = direction,
            None => keys.push(SortKey {
                column: column.to_string(),
                direction,
            }),
        }
    }

    Ok(keys)
}
