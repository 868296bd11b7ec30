//! Game Catalog REST Service - Binary Entry Point

use std::sync::Arc;

use game_catalog::api::{create_router, AppState};
use game_catalog::auth::{seed_users_from_env, AuthGate, JwtAuth};
use game_catalog::store::CatalogStore;
use game_catalog::types::CatalogResult;

#[tokio::main]
async fn main() -> CatalogResult<()> {
    let store = Arc::new(CatalogStore::new());
    eprintln!("[Store] Data file: {}", store.file_path());

    seed_users_from_env(&store)?;

    let jwt = Arc::new(JwtAuth::from_env());
    let gate = AuthGate::from_env(&jwt);
    eprintln!("[Auth] Gate: {}", gate.mode_name());

    let state = Arc::new(AppState::new(store, gate, jwt));
    let app = create_router(state);

    let addr = std::env::var("CATALOG_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("[Server] Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
