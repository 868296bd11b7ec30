//! Game Catalog REST Service
//!
//! A catalog of publishers, platforms, categories, and videogames exposed
//! through a uniform REST surface: paginated lists with navigation links,
//! multi-column sorting, free-text/numeric search, validated writes, and
//! a pluggable request-authentication gate.
//!
//! # Modules
//!
//! - `types`: entity structs and their `Resource` descriptors
//! - `store`: file-backed table set and the row query builder
//! - `catalog`: sort parsing, pagination planning, search dispatch, and
//!   the generic repository
//! - `validation`: per-entity field rules with accumulated failures
//! - `auth`: the authentication chain and JWT signing
//! - `api`: axum router, handlers, and response envelopes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use game_catalog::api::{create_router, AppState};
//! use game_catalog::auth::{AuthGate, JwtAuth};
//! use game_catalog::store::CatalogStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(CatalogStore::new());
//!     let jwt = Arc::new(JwtAuth::from_env());
//!     let gate = AuthGate::from_env(&jwt);
//!     let app = create_router(Arc::new(AppState::new(store, gate, jwt)));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use catalog::{ListPage, PageRequest, RepoError, Repository, Resource};
pub use store::CatalogStore;
pub use types::{Category, EsrbRating, Platform, Publisher, User, Videogame};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
