//! Catalog store - the storage collaborator
//!
//! Holds every table of the catalog behind a single `RwLock` and persists
//! the whole set as one JSON document after each mutation. The rest of the
//! crate consumes it through `read()` snapshots and the `Query` builder;
//! repositories never touch the file format.

mod query;

pub use query::Query;

use std::env;
use std::fs;
use std::path::Path;

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};

use crate::catalog::repo::RepoError;
use crate::types::{CatalogResult, Category, Platform, Publisher, User, Videogame};

/// Association row for the videogame <-> category set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideogameCategory {
    pub videogame_id: i64,
    pub category_id: i64,
}

/// Association row for the videogame <-> platform set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideogamePlatform {
    pub videogame_id: i64,
    pub platform_id: i64,
}

/// The full table set, serialized as one JSON document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub publishers: Vec<Publisher>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub videogames: Vec<Videogame>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub videogame_categories: Vec<VideogameCategory>,
    #[serde(default)]
    pub videogame_platforms: Vec<VideogamePlatform>,
}

/// File-backed catalog store with an in-memory working set
pub struct CatalogStore {
    data_file_path: String,
    data: RwLock<CatalogData>,
}

impl CatalogStore {
    /// Create a store using `CATALOG_DATA_PATH` (default: `catalog.json`
    /// in the current directory)
    pub fn new() -> Self {
        let current_dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        let default_data_path = current_dir.join("catalog.json");

        let data_file_path = match env::var("CATALOG_DATA_PATH") {
            Ok(path) => {
                if Path::new(&path).is_absolute() {
                    path
                } else {
                    current_dir.join(path).to_string_lossy().to_string()
                }
            }
            Err(_) => default_data_path.to_string_lossy().to_string(),
        };

        Self::with_file_path(data_file_path)
    }

    /// Create a store with an explicit data file path
    pub fn with_file_path(data_file_path: String) -> Self {
        let data = Self::load_data_from_file(&data_file_path).unwrap_or_default();

        Self {
            data_file_path,
            data: RwLock::new(data),
        }
    }

    /// Load the table set from file (missing file yields an empty set)
    fn load_data_from_file(file_path: &str) -> CatalogResult<CatalogData> {
        if !Path::new(file_path).exists() {
            return Ok(CatalogData::default());
        }

        let content = fs::read_to_string(file_path)?;
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Snapshot handle over the current table set
    pub fn read(&self) -> RwLockReadGuard<'_, CatalogData> {
        self.data.read()
    }

    /// Run a mutation under the write lock and persist the result.
    ///
    /// The operation runs against a working copy of the tables; the copy
    /// replaces the live set only after it has been written to disk, so a
    /// failed operation leaves neither memory nor file touched.
    pub fn mutate<T>(
        &self,
        op: impl FnOnce(&mut CatalogData) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let mut data = self.data.write();
        let mut working = data.clone();
        let out = op(&mut working)?;
        self.persist(&working)
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        *data = working;
        Ok(out)
    }

    /// Persist the table set (expects caller to hold the write lock)
    fn persist(&self, data: &CatalogData) -> CatalogResult<()> {
        if let Some(parent) = Path::new(&self.data_file_path).parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.data_file_path, content)?;
        Ok(())
    }

    /// Credential lookup for the authentication chain
    pub fn find_user(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Get the data file path
    pub fn file_path(&self) -> &str {
        &self.data_file_path
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
