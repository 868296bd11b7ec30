//! Publisher entity
//!
//! Owns many videogames through the `publisher_id` foreign key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::repo::{row_json, RepoError, Resource};
use crate::catalog::sort::SortValue;
use crate::store::CatalogData;
use crate::validation::{Check, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default)]
    pub publisher_id: i64,
    pub publisher_name: String,
    pub country: String,
    pub founded_year: i64,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(deserialize_with = "crate::types::boolish")]
    pub active_status: bool,
}

impl Resource for Publisher {
    const LABEL: &'static str = "Publisher";
    const COLLECTION: &'static str = "publishers";
    const PRIMARY_KEY: &'static str = "publisher_id";
    const SORTABLE: &'static [&'static str] = &[
        "publisher_id",
        "publisher_name",
        "country",
        "founded_year",
        "active_status",
    ];
    const NUMERIC_SEARCH: &'static [&'static str] = &["publisher_id"];
    const TEXT_SEARCH: &'static [&'static str] = &["publisher_name", "country", "website_url"];
    const RELATIONS: &'static [&'static str] = &["videogames"];

    fn table(data: &CatalogData) -> &Vec<Self> {
        &data.publishers
    }

    fn table_mut(data: &mut CatalogData) -> &mut Vec<Self> {
        &mut data.publishers
    }

    fn id(&self) -> i64 {
        self.publisher_id
    }

    fn assign_id(&mut self, id: i64) {
        self.publisher_id = id;
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "publisher_id" => Some(SortValue::Int(self.publisher_id)),
            "publisher_name" => Some(SortValue::text(&self.publisher_name)),
            "country" => Some(SortValue::text(&self.country)),
            "founded_year" => Some(SortValue::Int(self.founded_year)),
            "active_status" => Some(SortValue::Bool(self.active_status)),
            _ => None,
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            "publisher_id" => Some(self.publisher_id as f64),
            _ => None,
        }
    }

    fn text_value(&self, field: &str) -> Option<&str> {
        match field {
            "publisher_name" => Some(&self.publisher_name),
            "country" => Some(&self.country),
            "website_url" => self.website_url.as_deref(),
            _ => None,
        }
    }

    fn rules() -> Vec<FieldRule> {
        vec![
            FieldRule::new("publisher_name", Check::NonEmptyString),
            FieldRule::new("country", Check::NonEmptyString),
            FieldRule::new("founded_year", Check::IntRange(1900, 2030)),
            FieldRule::new("website_url", Check::UrlOrNull),
            FieldRule::new("active_status", Check::Boolish),
        ]
    }

    fn related(data: &CatalogData, id: i64, relation: &str) -> Option<Vec<Value>> {
        match relation {
            "videogames" => Some(
                data.videogames
                    .iter()
                    .filter(|v| v.publisher_id == id)
                    .map(row_json)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Refuses the delete while dependent videogames exist (restrict policy).
    fn detach(data: &mut CatalogData, id: i64) -> Result<(), RepoError> {
        let dependents = data
            .videogames
            .iter()
            .filter(|v| v.publisher_id == id)
            .count();
        if dependents > 0 {
            return Err(RepoError::Conflict(format!(
                "Publisher {} still has {} videogames",
                id, dependents
            )));
        }
        Ok(())
    }
}
