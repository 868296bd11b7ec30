//! Platform entity
//!
//! Related to videogames through the `videogame_platforms` association set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::repo::{row_json, RepoError, Resource};
use crate::catalog::sort::SortValue;
use crate::store::CatalogData;
use crate::validation::{Check, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub platform_id: i64,
    pub platform_name: String,
    pub form_factor: String,
    pub generation: i64,
    pub release_year: i64,
    #[serde(deserialize_with = "crate::types::boolish")]
    pub is_backwards_compatible: bool,
}

impl Resource for Platform {
    const LABEL: &'static str = "Platform";
    const COLLECTION: &'static str = "platforms";
    const PRIMARY_KEY: &'static str = "platform_id";
    const SORTABLE: &'static [&'static str] = &[
        "platform_id",
        "platform_name",
        "form_factor",
        "generation",
        "release_year",
        "is_backwards_compatible",
    ];
    const NUMERIC_SEARCH: &'static [&'static str] = &["platform_id", "generation", "release_year"];
    const TEXT_SEARCH: &'static [&'static str] = &["platform_name", "form_factor"];
    const RELATIONS: &'static [&'static str] = &["videogames"];

    fn table(data: &CatalogData) -> &Vec<Self> {
        &data.platforms
    }

    fn table_mut(data: &mut CatalogData) -> &mut Vec<Self> {
        &mut data.platforms
    }

    fn id(&self) -> i64 {
        self.platform_id
    }

    fn assign_id(&mut self, id: i64) {
        self.platform_id = id;
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "platform_id" => Some(SortValue::Int(self.platform_id)),
            "platform_name" => Some(SortValue::text(&self.platform_name)),
            "form_factor" => Some(SortValue::text(&self.form_factor)),
            "generation" => Some(SortValue::Int(self.generation)),
            "release_year" => Some(SortValue::Int(self.release_year)),
            "is_backwards_compatible" => Some(SortValue::Bool(self.is_backwards_compatible)),
            _ => None,
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            "platform_id" => Some(self.platform_id as f64),
            "generation" => Some(self.generation as f64),
            "release_year" => Some(self.release_year as f64),
            _ => None,
        }
    }

    fn text_value(&self, field: &str) -> Option<&str> {
        match field {
            "platform_name" => Some(&self.platform_name),
            "form_factor" => Some(&self.form_factor),
            _ => None,
        }
    }

    fn rules() -> Vec<FieldRule> {
        vec![
            FieldRule::new("platform_name", Check::NonEmptyString),
            FieldRule::new("form_factor", Check::NonEmptyString),
            FieldRule::new("generation", Check::Integer),
            FieldRule::new("release_year", Check::IntRange(1900, 2030)),
            FieldRule::new("is_backwards_compatible", Check::Boolish),
        ]
    }

    fn related(data: &CatalogData, id: i64, relation: &str) -> Option<Vec<Value>> {
        match relation {
            "videogames" => {
                let linked: HashSet<i64> = data
                    .videogame_platforms
                    .iter()
                    .filter(|link| link.platform_id == id)
                    .map(|link| link.videogame_id)
                    .collect();
                Some(
                    data.videogames
                        .iter()
                        .filter(|v| linked.contains(&v.videogame_id))
                        .map(row_json)
                        .collect(),
                )
            }
            _ => None,
        }
    }

    /// Association rows go with the platform; videogames themselves stay.
    fn detach(data: &mut CatalogData, id: i64) -> Result<(), RepoError> {
        data.videogame_platforms
            .retain(|link| link.platform_id != id);
        Ok(())
    }
}
