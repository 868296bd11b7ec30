//! Search dispatch
//!
//! A single free-text term searches each entity over its declared field
//! sets. A numeric term matches rows where ANY numeric search field is
//! greater than or equal to the term (inclusive lower bound - a range
//! scan, not an equality probe). Anything else matches rows where any
//! text search field contains the term, case-insensitively. Search
//! results are never paginated or sorted.

use rayon::prelude::*;

use super::repo::Resource;
use crate::store::Query;

/// Row count above which the scan goes parallel
const PARALLEL_SEARCH_THRESHOLD: usize = 1000;

/// A classified search term
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTerm {
    Numeric(f64),
    Text(String),
}

impl SearchTerm {
    /// Classify a raw term: anything that parses as a number searches the
    /// numeric fields, everything else the text fields.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(number) => SearchTerm::Numeric(number),
            Err(_) => SearchTerm::Text(raw.to_lowercase()),
        }
    }

    /// Does the row match this term on its declared search fields?
    pub fn matches<R: Resource>(&self, row: &R) -> bool {
        match self {
            SearchTerm::Numeric(bound) => R::NUMERIC_SEARCH.iter().any(|field| {
                row.numeric_value(field)
                    .map(|value| value >= *bound)
                    .unwrap_or(false)
            }),
            SearchTerm::Text(needle) => R::TEXT_SEARCH.iter().any(|field| {
                row.text_value(field)
                    .map(|value| value.to_lowercase().contains(needle))
                    .unwrap_or(false)
            }),
        }
    }
}

/// Scan a table for every row matching the term
pub fn search_rows<R: Resource>(rows: &[R], raw: &str) -> Vec<R> {
    let term = SearchTerm::parse(raw);

    if rows.len() > PARALLEL_SEARCH_THRESHOLD {
        rows.par_iter()
            .filter(|row| term.matches(*row))
            .cloned()
            .collect()
    } else {
        Query::over(rows).filter(|row| term.matches(row)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Platform;
    use serde_json::json;

    fn platform(id: i64, name: &str, form_factor: &str, generation: i64, year: i64) -> Platform {
        serde_json::from_value(json!({
            "platform_id": id,
            "platform_name": name,
            "form_factor": form_factor,
            "generation": generation,
            "release_year": year,
            "is_backwards_compatible": false
        }))
        .unwrap()
    }

    fn fleet() -> Vec<Platform> {
        vec![
            platform(1, "NES", "Console", 3, 1983),
            platform(2, "Game Boy", "Handheld", 4, 1989),
            platform(3, "PlayStation 2", "Console", 6, 2000),
            platform(4, "Nintendo Switch", "Hybrid", 8, 2017),
            platform(2500, "Arcade Cabinet", "Cabinet", 1, 1978),
        ]
    }

    #[test]
    fn test_numeric_term_is_inclusive_lower_bound_union() {
        // "2000" matches release_year >= 2000 OR generation >= 2000 OR
        // platform_id >= 2000
        let matches = search_rows(&fleet(), "2000");
        let ids: Vec<i64> = matches.iter().map(|p| p.platform_id).collect();
        assert_eq!(ids, vec![3, 4, 2500]);
    }

    #[test]
    fn test_text_term_is_case_insensitive_substring() {
        let matches = search_rows(&fleet(), "switch");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].platform_name, "Nintendo Switch");

        // form_factor is searched too
        let matches = search_rows(&fleet(), "hand");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].platform_name, "Game Boy");
    }

    #[test]
    fn test_unmatched_term_is_empty() {
        assert!(search_rows(&fleet(), "dreamcast").is_empty());
        assert!(search_rows(&fleet(), "99999").is_empty());
    }

    #[test]
    fn test_term_classification() {
        assert_eq!(SearchTerm::parse(" 42 "), SearchTerm::Numeric(42.0));
        assert_eq!(SearchTerm::parse("4.5"), SearchTerm::Numeric(4.5));
        assert_eq!(
            SearchTerm::parse("Zelda"),
            SearchTerm::Text("zelda".to_string())
        );
    }
}
