//! Generic resource repository
//!
//! One repository type serves every entity. The per-entity differences -
//! table, primary key, sortable columns, search fields, validation rules,
//! relations, write hooks - are captured by the `Resource` descriptor
//! trait, implemented next to each entity struct in `crate::types`.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::page::{page_links, Link, PageRequest};
use super::search::search_rows;
use super::sort::{parse_sort_keys, SortDirection, SortError, SortKey, SortValue};
use crate::store::{CatalogData, CatalogStore, Query};
use crate::validation::{validate, FieldRule, ValidationErrors};

/// Failure taxonomy for repository operations
#[derive(Debug)]
pub enum RepoError {
    /// No row with the requested id
    NotFound { resource: &'static str, id: i64 },
    /// The entity declares no relation by that name
    UnknownRelation {
        resource: &'static str,
        relation: String,
    },
    /// The sort specification failed to parse
    Sort(SortError),
    /// A parsed sort column is not in the entity's sortable set
    UnknownSortColumn {
        resource: &'static str,
        column: String,
    },
    /// One or more field rules failed; the map is the user-facing payload
    Validation(ValidationErrors),
    /// The body could not be decoded into the entity at all
    Malformed(String),
    /// The write collides with an existing row or dependent rows
    Conflict(String),
    /// The storage collaborator failed
    Storage(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::NotFound { resource, id } => {
                write!(f, "{} {} not found", resource, id)
            }
            RepoError::UnknownRelation { resource, relation } => {
                write!(f, "{} have no relation '{}'", resource, relation)
            }
            RepoError::Sort(err) => err.fmt(f),
            RepoError::UnknownSortColumn { resource, column } => {
                write!(f, "'{}' is not a sortable column of {}", column, resource)
            }
            RepoError::Validation(errors) => {
                write!(f, "validation failed on {} field(s)", errors.len())
            }
            RepoError::Malformed(reason) => write!(f, "malformed body: {}", reason),
            RepoError::Conflict(reason) => write!(f, "conflict: {}", reason),
            RepoError::Storage(reason) => write!(f, "storage failure: {}", reason),
        }
    }
}

impl std::error::Error for RepoError {}

impl From<SortError> for RepoError {
    fn from(err: SortError) -> Self {
        RepoError::Sort(err)
    }
}

/// Entity descriptor consumed by `Repository`
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Singular display label, e.g. "Platform"
    const LABEL: &'static str;
    /// Plural collection segment, e.g. "platforms"
    const COLLECTION: &'static str;
    /// Primary-key field name
    const PRIMARY_KEY: &'static str;
    /// Columns the entity permits ordering by
    const SORTABLE: &'static [&'static str];
    /// Fields a numeric search term scans
    const NUMERIC_SEARCH: &'static [&'static str];
    /// Fields a text search term scans
    const TEXT_SEARCH: &'static [&'static str];
    /// Declared relation names, eager-loaded into list items
    const RELATIONS: &'static [&'static str];

    fn table(data: &CatalogData) -> &Vec<Self>;
    fn table_mut(data: &mut CatalogData) -> &mut Vec<Self>;

    fn id(&self) -> i64;
    fn assign_id(&mut self, id: i64);

    /// Comparable value of one sortable column; None for unknown columns
    fn sort_value(&self, column: &str) -> Option<SortValue>;
    /// Value of one numeric search field
    fn numeric_value(&self, field: &str) -> Option<f64>;
    /// Value of one text search field
    fn text_value(&self, field: &str) -> Option<&str>;

    /// The entity's ordered validation rule list
    fn rules() -> Vec<FieldRule>;

    /// Rows of a named relation, serialized; None for an undeclared name
    fn related(data: &CatalogData, id: i64, relation: &str) -> Option<Vec<Value>>;

    /// Referential checks at write time (foreign keys, association ids,
    /// uniqueness). Runs with the row's final id already assigned for
    /// updates; failures merge into the validation error payload.
    fn check_references(&self, _body: &Value, _data: &CatalogData) -> ValidationErrors {
        ValidationErrors::new()
    }

    /// Last transform before the row is persisted (e.g. password hashing)
    fn prepare_write(&mut self) -> Result<(), RepoError> {
        Ok(())
    }

    /// Replace association rows derived from the write body
    fn apply_links(_data: &mut CatalogData, _id: i64, _body: &Value) {}

    /// Enforce delete integrity: refuse or cascade association rows
    fn detach(_data: &mut CatalogData, _id: i64) -> Result<(), RepoError> {
        Ok(())
    }

    /// Strip non-public fields from a serialized row
    fn redact(_row: &mut Value) {}
}

/// A page of list results; serializes directly as the list envelope
#[derive(Debug, Serialize)]
pub struct ListPage {
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    pub limit: usize,
    pub offset: usize,
    pub links: Vec<Link>,
    pub sort: serde_json::Map<String, Value>,
    pub data: Vec<Value>,
}

/// Serialize a row, swallowing the impossible failure case
pub(crate) fn row_json<T: Serialize>(row: &T) -> Value {
    serde_json::to_value(row).unwrap_or(Value::Null)
}

/// Decode an id array from a write body value
pub(crate) fn id_array(value: &Value) -> Option<Vec<i64>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_i64)
        .collect::<Option<Vec<i64>>>()
}

fn compare_rows<R: Resource>(a: &R, b: &R, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = match (a.sort_value(&key.column), b.sort_value(&key.column)) {
            (Some(left), Some(right)) => left.cmp(&right),
            _ => Ordering::Equal,
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn sort_map(keys: &[SortKey]) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    for key in keys {
        map.insert(
            key.column.clone(),
            Value::String(key.direction.as_str().to_string()),
        );
    }
    map
}

/// The uniform repository over one entity's table
pub struct Repository<R: Resource> {
    store: Arc<CatalogStore>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// List a page: sort, window, eager-load relations, build links.
    ///
    /// Count and page come from the same snapshot, so the links always
    /// agree with the data.
    pub fn list(&self, page: &PageRequest) -> Result<ListPage, RepoError> {
        let keys = parse_sort_keys(page.sort.as_deref().unwrap_or(""))?;
        for key in &keys {
            if !R::SORTABLE.contains(&key.column.as_str()) {
                return Err(RepoError::UnknownSortColumn {
                    resource: R::COLLECTION,
                    column: key.column.clone(),
                });
            }
        }

        let data = self.store.read();
        let rows = R::table(&data);
        let total = rows.len();

        let selected = Query::over(rows)
            .order_by(|a, b| compare_rows(a, b, &keys))
            .skip(page.offset)
            .take(page.limit)
            .cloned();

        Ok(ListPage {
            total_count: total,
            limit: page.limit,
            offset: page.offset,
            links: page_links(&page.base_url, page.limit, page.offset, total),
            sort: sort_map(&keys),
            data: selected
                .iter()
                .map(|row| Self::item_json(row, &data))
                .collect(),
        })
    }

    /// Fetch one row by primary key
    pub fn get_by_id(&self, id: i64) -> Result<Value, RepoError> {
        let data = self.store.read();
        let row = R::table(&data)
            .iter()
            .find(|r| r.id() == id)
            .ok_or(RepoError::NotFound {
                resource: R::LABEL,
                id,
            })?;

        let mut value = row_json(row);
        R::redact(&mut value);
        Ok(value)
    }

    /// Fetch the rows of a named relation of one owning row
    pub fn get_related(&self, id: i64, relation: &str) -> Result<Vec<Value>, RepoError> {
        let data = self.store.read();
        if !R::table(&data).iter().any(|r| r.id() == id) {
            return Err(RepoError::NotFound {
                resource: R::LABEL,
                id,
            });
        }

        R::related(&data, id, relation).ok_or_else(|| RepoError::UnknownRelation {
            resource: R::COLLECTION,
            relation: relation.to_string(),
        })
    }

    /// Free-text/numeric search; the full match set, unpaginated
    pub fn search(&self, term: &str) -> Vec<Value> {
        let data = self.store.read();
        search_rows(R::table(&data), term)
            .iter()
            .map(|row| {
                let mut value = row_json(row);
                R::redact(&mut value);
                value
            })
            .collect()
    }

    /// Validate and insert a new row.
    ///
    /// A client-supplied primary key is honored; an absent one is assigned
    /// the next free id. A duplicate id is a conflict.
    pub fn create(&self, body: &Value) -> Result<Value, RepoError> {
        let errors = validate(&R::rules(), None, body);
        if !errors.is_empty() {
            return Err(RepoError::Validation(errors));
        }

        let mut row: R = serde_json::from_value(body.clone())
            .map_err(|e| RepoError::Malformed(e.to_string()))?;

        let created = self.store.mutate(|data| {
            let references = row.check_references(body, data);
            if !references.is_empty() {
                return Err(RepoError::Validation(references));
            }

            if row.id() == 0 {
                let next = R::table(data).iter().map(Resource::id).max().unwrap_or(0) + 1;
                row.assign_id(next);
            } else if R::table(data).iter().any(|r| r.id() == row.id()) {
                return Err(RepoError::Conflict(format!(
                    "{} {} already exists",
                    R::LABEL,
                    row.id()
                )));
            }

            row.prepare_write()?;
            R::table_mut(data).push(row.clone());
            R::apply_links(data, row.id(), body);
            Ok(row.clone())
        })?;

        let mut value = row_json(&created);
        R::redact(&mut value);
        Ok(value)
    }

    /// Validate and replace an existing row wholesale
    pub fn update(&self, id: i64, body: &Value) -> Result<Value, RepoError> {
        let updated = self.store.mutate(|data| {
            let position = R::table(data)
                .iter()
                .position(|r| r.id() == id)
                .ok_or(RepoError::NotFound {
                    resource: R::LABEL,
                    id,
                })?;

            let errors = validate(&R::rules(), Some((R::PRIMARY_KEY, id)), body);
            if !errors.is_empty() {
                return Err(RepoError::Validation(errors));
            }

            let mut row: R = serde_json::from_value(body.clone())
                .map_err(|e| RepoError::Malformed(e.to_string()))?;
            row.assign_id(id);

            let references = row.check_references(body, data);
            if !references.is_empty() {
                return Err(RepoError::Validation(references));
            }

            row.prepare_write()?;
            R::table_mut(data)[position] = row.clone();
            R::apply_links(data, id, body);
            Ok(row)
        })?;

        let mut value = row_json(&updated);
        R::redact(&mut value);
        Ok(value)
    }

    /// Remove a row, honoring the entity's delete-integrity policy
    pub fn delete(&self, id: i64) -> Result<bool, RepoError> {
        self.store.mutate(|data| {
            let position = R::table(data)
                .iter()
                .position(|r| r.id() == id)
                .ok_or(RepoError::NotFound {
                    resource: R::LABEL,
                    id,
                })?;

            R::detach(data, id)?;
            R::table_mut(data).remove(position);
            Ok(true)
        })
    }

    fn item_json(row: &R, data: &CatalogData) -> Value {
        let mut value = row_json(row);
        R::redact(&mut value);

        if let Value::Object(map) = &mut value {
            for relation in R::RELATIONS {
                if let Some(rows) = R::related(data, row.id(), relation) {
                    map.insert((*relation).to_string(), Value::Array(rows));
                }
            }
        }

        value
    }
}
