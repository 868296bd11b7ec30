//! Generic resource handlers
//!
//! One handler set serves every entity group; the router instantiates
//! them per `Resource` type. Query parameters arrive as raw strings so
//! that a non-numeric `limit` degrades to the default instead of a serde
//! rejection.

use std::sync::Arc;

use axum::extract::{Host, OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::super::envelope::{MutationEnvelope, StatusEnvelope};
use super::super::state::AppState;
use crate::catalog::{PageRequest, Repository, Resource};

/// Raw query parameters of a list request
#[derive(Debug, Deserialize)]
pub struct IndexParams {
    /// Free-text/numeric search term; bypasses pagination and sort
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
}

fn repository<R: Resource>(state: &AppState) -> Repository<R> {
    Repository::new(state.store.clone())
}

/// Canonical request URL: scheme + host + path, query string stripped
fn base_url(host: &str, path: &str) -> String {
    format!("http://{}{}", host, path)
}

/// GET /<collection> - paginated, sorted list; `?q=` switches to search
pub async fn index<R: Resource>(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<IndexParams>,
) -> Response {
    let repo = repository::<R>(&state);

    if let Some(term) = params.q.as_deref().filter(|t| !t.trim().is_empty()) {
        return Json(repo.search(term)).into_response();
    }

    let page = PageRequest::from_query(
        params.limit.as_deref(),
        params.offset.as_deref(),
        params.sort.clone(),
        base_url(&host, uri.path()),
    );

    match repo.list(&page) {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /<collection>/:id
pub async fn view<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match repository::<R>(&state).get_by_id(id) {
        Ok(row) => Json(row).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /<collection>/:id/:relation
pub async fn related<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path((id, relation)): Path<(i64, String)>,
) -> Response {
    match repository::<R>(&state).get_related(id, &relation) {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => err.into_response(),
    }
}

/// POST /<collection>
pub async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    match repository::<R>(&state).create(&body) {
        Ok(row) => (
            StatusCode::CREATED,
            Json(MutationEnvelope::new(
                format!("{} has been created", R::LABEL),
                row,
            )),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// PUT /<collection>/:id
pub async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    match repository::<R>(&state).update(id, &body) {
        Ok(row) => Json(MutationEnvelope::new(
            format!("{} has been updated", R::LABEL),
            row,
        ))
        .into_response(),
        Err(err) => err.into_response(),
    }
}

/// DELETE /<collection>/:id
pub async fn remove<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match repository::<R>(&state).delete(id) {
        Ok(_) => Json(StatusEnvelope::new(format!(
            "{} has been deleted",
            R::LABEL
        )))
        .into_response(),
        Err(err) => err.into_response(),
    }
}
