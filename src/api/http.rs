//! HTTP server setup with Axum

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::middleware::require_auth;
use super::rest::{auth, resources};
use super::state::AppState;
use crate::catalog::Resource;
use crate::types::{Category, Platform, Publisher, User, Videogame};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every resource group sits behind the configured gate.
    let catalog = Router::new()
        .merge(resource_routes::<Publisher>())
        .merge(resource_routes::<Platform>())
        .merge(resource_routes::<Category>())
        .merge(resource_routes::<Videogame>())
        .merge(resource_routes::<User>())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/auth/token", post(auth::issue_token))
        .route("/auth/refresh", post(auth::refresh_token))
        .nest("/api/v1", catalog)
        .layer(cors)
        .with_state(state)
}

/// The uniform route set of one entity group, rooted at its collection name
fn resource_routes<R: Resource>() -> Router<Arc<AppState>> {
    let base = format!("/{}", R::COLLECTION);
    Router::new()
        .route(
            &base,
            get(resources::index::<R>).post(resources::create::<R>),
        )
        .route(
            &format!("{}/:id", base),
            get(resources::view::<R>)
                .put(resources::update::<R>)
                .delete(resources::remove::<R>),
        )
        .route(
            &format!("{}/:id/:relation", base),
            get(resources::related::<R>),
        )
}

/// Welcome endpoint
async fn welcome() -> &'static str {
    "Welcome to the Game Catalog API"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
