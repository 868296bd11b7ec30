//! Videogame entity
//!
//! The central catalog entity: owned by a publisher, linked to categories
//! and platforms through association sets. Write bodies may carry optional
//! `category_ids` / `platform_ids` arrays which replace the association
//! rows together with the row write.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::repo::{id_array, row_json, RepoError, Resource};
use crate::catalog::sort::SortValue;
use crate::store::{CatalogData, VideogameCategory, VideogamePlatform};
use crate::validation::{Check, FieldRule, ValidationErrors};

/// ESRB content rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EsrbRating {
    E,
    #[serde(rename = "E10+")]
    E10Plus,
    T,
    M,
    AO,
}

impl EsrbRating {
    pub const VALUES: &'static [&'static str] = &["E", "E10+", "T", "M", "AO"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EsrbRating::E => "E",
            EsrbRating::E10Plus => "E10+",
            EsrbRating::T => "T",
            EsrbRating::M => "M",
            EsrbRating::AO => "AO",
        }
    }
}

impl fmt::Display for EsrbRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Videogame {
    #[serde(default)]
    pub videogame_id: i64,
    pub publisher_id: i64,
    pub title: String,
    pub release_year: i64,
    pub esrb_rating: EsrbRating,
    pub game_description: String,
    #[serde(deserialize_with = "crate::types::boolish")]
    pub is_multiplayer: bool,
}

impl Resource for Videogame {
    const LABEL: &'static str = "Videogame";
    const COLLECTION: &'static str = "videogames";
    const PRIMARY_KEY: &'static str = "videogame_id";
    const SORTABLE: &'static [&'static str] = &[
        "videogame_id",
        "publisher_id",
        "title",
        "release_year",
        "esrb_rating",
        "is_multiplayer",
    ];
    const NUMERIC_SEARCH: &'static [&'static str] =
        &["videogame_id", "publisher_id", "release_year"];
    const TEXT_SEARCH: &'static [&'static str] = &["title", "game_description"];
    const RELATIONS: &'static [&'static str] = &["categories", "platforms"];

    fn table(data: &CatalogData) -> &Vec<Self> {
        &data.videogames
    }

    fn table_mut(data: &mut CatalogData) -> &mut Vec<Self> {
        &mut data.videogames
    }

    fn id(&self) -> i64 {
        self.videogame_id
    }

    fn assign_id(&mut self, id: i64) {
        self.videogame_id = id;
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "videogame_id" => Some(SortValue::Int(self.videogame_id)),
            "publisher_id" => Some(SortValue::Int(self.publisher_id)),
            "title" => Some(SortValue::text(&self.title)),
            "release_year" => Some(SortValue::Int(self.release_year)),
            "esrb_rating" => Some(SortValue::text(self.esrb_rating.as_str())),
            "is_multiplayer" => Some(SortValue::Bool(self.is_multiplayer)),
            _ => None,
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            "videogame_id" => Some(self.videogame_id as f64),
            "publisher_id" => Some(self.publisher_id as f64),
            "release_year" => Some(self.release_year as f64),
            _ => None,
        }
    }

    fn text_value(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "game_description" => Some(&self.game_description),
            _ => None,
        }
    }

    fn rules() -> Vec<FieldRule> {
        vec![
            FieldRule::new("publisher_id", Check::Integer),
            FieldRule::new("title", Check::NonEmptyString),
            FieldRule::new("release_year", Check::IntRange(1900, 2030)),
            FieldRule::new("esrb_rating", Check::OneOf(EsrbRating::VALUES)),
            FieldRule::new("game_description", Check::NonEmptyString),
            FieldRule::new("is_multiplayer", Check::Boolish),
        ]
    }

    fn related(data: &CatalogData, id: i64, relation: &str) -> Option<Vec<Value>> {
        match relation {
            "categories" => {
                let linked: HashSet<i64> = data
                    .videogame_categories
                    .iter()
                    .filter(|link| link.videogame_id == id)
                    .map(|link| link.category_id)
                    .collect();
                Some(
                    data.categories
                        .iter()
                        .filter(|c| linked.contains(&c.category_id))
                        .map(row_json)
                        .collect(),
                )
            }
            "platforms" => {
                let linked: HashSet<i64> = data
                    .videogame_platforms
                    .iter()
                    .filter(|link| link.videogame_id == id)
                    .map(|link| link.platform_id)
                    .collect();
                Some(
                    data.platforms
                        .iter()
                        .filter(|p| linked.contains(&p.platform_id))
                        .map(row_json)
                        .collect(),
                )
            }
            _ => None,
        }
    }

    fn check_references(&self, body: &Value, data: &CatalogData) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !data
            .publishers
            .iter()
            .any(|p| p.publisher_id == self.publisher_id)
        {
            errors.insert(
                "publisher_id".to_string(),
                "must reference an existing publisher".to_string(),
            );
        }

        if let Some(raw) = body.get("category_ids") {
            match id_array(raw) {
                Some(ids) => {
                    if let Some(missing) = ids
                        .iter()
                        .find(|id| !data.categories.iter().any(|c| c.category_id == **id))
                    {
                        errors.insert(
                            "category_ids".to_string(),
                            format!("unknown category id {}", missing),
                        );
                    }
                }
                None => {
                    errors.insert(
                        "category_ids".to_string(),
                        "must be an array of integer ids".to_string(),
                    );
                }
            }
        }

        if let Some(raw) = body.get("platform_ids") {
            match id_array(raw) {
                Some(ids) => {
                    if let Some(missing) = ids
                        .iter()
                        .find(|id| !data.platforms.iter().any(|p| p.platform_id == **id))
                    {
                        errors.insert(
                            "platform_ids".to_string(),
                            format!("unknown platform id {}", missing),
                        );
                    }
                }
                None => {
                    errors.insert(
                        "platform_ids".to_string(),
                        "must be an array of integer ids".to_string(),
                    );
                }
            }
        }

        errors
    }

    fn apply_links(data: &mut CatalogData, id: i64, body: &Value) {
        if let Some(ids) = body.get("category_ids").and_then(id_array) {
            data.videogame_categories
                .retain(|link| link.videogame_id != id);
            for category_id in ids {
                data.videogame_categories.push(VideogameCategory {
                    videogame_id: id,
                    category_id,
                });
            }
        }

        if let Some(ids) = body.get("platform_ids").and_then(id_array) {
            data.videogame_platforms
                .retain(|link| link.videogame_id != id);
            for platform_id in ids {
                data.videogame_platforms.push(VideogamePlatform {
                    videogame_id: id,
                    platform_id,
                });
            }
        }
    }

    fn detach(data: &mut CatalogData, id: i64) -> Result<(), RepoError> {
        data.videogame_categories
            .retain(|link| link.videogame_id != id);
        data.videogame_platforms
            .retain(|link| link.videogame_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_esrb_rating_serializes_as_label() {
        assert_eq!(serde_json::to_value(EsrbRating::E10Plus).unwrap(), json!("E10+"));
        assert_eq!(serde_json::to_value(EsrbRating::AO).unwrap(), json!("AO"));

        let rating: EsrbRating = serde_json::from_value(json!("E10+")).unwrap();
        assert_eq!(rating, EsrbRating::E10Plus);
    }

    #[test]
    fn test_esrb_rating_rejects_unknown_label() {
        assert!(serde_json::from_value::<EsrbRating>(json!("X")).is_err());
    }
}
