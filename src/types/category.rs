//! Category entity
//!
//! Related to videogames through the `videogame_categories` association set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::repo::{row_json, RepoError, Resource};
use crate::catalog::sort::SortValue;
use crate::store::CatalogData;
use crate::validation::{Check, FieldRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub category_id: i64,
    pub category_name: String,
    pub description: String,
}

impl Resource for Category {
    const LABEL: &'static str = "Category";
    const COLLECTION: &'static str = "categories";
    const PRIMARY_KEY: &'static str = "category_id";
    const SORTABLE: &'static [&'static str] = &["category_id", "category_name", "description"];
    const NUMERIC_SEARCH: &'static [&'static str] = &["category_id"];
    const TEXT_SEARCH: &'static [&'static str] = &["category_name", "description"];
    const RELATIONS: &'static [&'static str] = &["videogames"];

    fn table(data: &CatalogData) -> &Vec<Self> {
        &data.categories
    }

    fn table_mut(data: &mut CatalogData) -> &mut Vec<Self> {
        &mut data.categories
    }

    fn id(&self) -> i64 {
        self.category_id
    }

    fn assign_id(&mut self, id: i64) {
        self.category_id = id;
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "category_id" => Some(SortValue::Int(self.category_id)),
            "category_name" => Some(SortValue::text(&self.category_name)),
            "description" => Some(SortValue::text(&self.description)),
            _ => None,
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            "category_id" => Some(self.category_id as f64),
            _ => None,
        }
    }

    fn text_value(&self, field: &str) -> Option<&str> {
        match field {
            "category_name" => Some(&self.category_name),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn rules() -> Vec<FieldRule> {
        vec![
            FieldRule::new("category_name", Check::NonEmptyString),
            FieldRule::new("description", Check::NonEmptyString),
        ]
    }

    fn related(data: &CatalogData, id: i64, relation: &str) -> Option<Vec<Value>> {
        match relation {
            "videogames" => {
                let linked: HashSet<i64> = data
                    .videogame_categories
                    .iter()
                    .filter(|link| link.category_id == id)
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

    fn detach(data: &mut CatalogData, id: i64) -> Result<(), RepoError> {
        data.videogame_categories
            .retain(|link| link.category_id != id);
        Ok(())
    }
}
