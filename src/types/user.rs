//! User entity
//!
//! Backs the credential checks of the authentication chain. The `password`
//! field holds a bcrypt hash at rest; plaintext only exists inside an
//! incoming write body and is hashed before the row is persisted. The hash
//! is stripped from every API response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::repo::{RepoError, Resource};
use crate::catalog::sort::SortValue;
use crate::store::CatalogData;
use crate::validation::{Check, FieldRule, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: i64,
}

impl Resource for User {
    const LABEL: &'static str = "User";
    const COLLECTION: &'static str = "users";
    const PRIMARY_KEY: &'static str = "id";
    const SORTABLE: &'static [&'static str] = &["id", "name", "email", "username", "role"];
    const NUMERIC_SEARCH: &'static [&'static str] = &["id", "role"];
    const TEXT_SEARCH: &'static [&'static str] = &["name", "email", "username"];
    const RELATIONS: &'static [&'static str] = &[];

    fn table(data: &CatalogData) -> &Vec<Self> {
        &data.users
    }

    fn table_mut(data: &mut CatalogData) -> &mut Vec<Self> {
        &mut data.users
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "id" => Some(SortValue::Int(self.id)),
            "name" => Some(SortValue::text(&self.name)),
            "email" => Some(SortValue::text(&self.email)),
            "username" => Some(SortValue::text(&self.username)),
            "role" => Some(SortValue::Int(self.role)),
            _ => None,
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            "id" => Some(self.id as f64),
            "role" => Some(self.role as f64),
            _ => None,
        }
    }

    fn text_value(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "username" => Some(&self.username),
            _ => None,
        }
    }

    fn rules() -> Vec<FieldRule> {
        vec![
            FieldRule::new("name", Check::AlnumSpaces),
            FieldRule::new("email", Check::Email),
            FieldRule::new("username", Check::NonEmpty),
            FieldRule::new("password", Check::NonEmpty),
            FieldRule::new("role", Check::NumRange(1, 4)),
        ]
    }

    fn related(_data: &CatalogData, _id: i64, _relation: &str) -> Option<Vec<Value>> {
        None
    }

    fn check_references(&self, _body: &Value, data: &CatalogData) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if data
            .users
            .iter()
            .any(|u| u.username == self.username && u.id != self.id)
        {
            errors.insert("username".to_string(), "is already taken".to_string());
        }
        errors
    }

    fn prepare_write(&mut self) -> Result<(), RepoError> {
        self.password = bcrypt::hash(&self.password, bcrypt::DEFAULT_COST)
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        Ok(())
    }

    fn redact(row: &mut Value) {
        if let Value::Object(map) = row {
            map.remove("password");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_strips_password_hash() {
        let user = User {
            id: 1,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            username: "bob".to_string(),
            password: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            role: 2,
        };

        let mut value = serde_json::to_value(&user).unwrap();
        User::redact(&mut value);

        assert!(value.get("password").is_none());
        assert_eq!(value.get("username"), Some(&json!("bob")));
    }
}
