//! Core request machinery
//!
//! Everything the entity routes share: the sort-key parser, the
//! pagination planner, the search dispatcher, and the generic repository
//! that composes them against the store's query builder. The per-entity
//! differences live entirely in the `Resource` descriptors under
//! `crate::types`.

pub mod page;
pub mod repo;
pub mod search;
pub mod sort;

pub use page::{page_links, Link, PageRequest, DEFAULT_LIMIT};
pub use repo::{ListPage, RepoError, Repository, Resource};
pub use search::{search_rows, SearchTerm};
pub use sort::{parse_sort_keys, SortDirection, SortError, SortKey, SortValue};
