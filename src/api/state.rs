//! Shared application state

use std::sync::Arc;

use crate::auth::{AuthGate, JwtAuth};
use crate::store::CatalogStore;

/// State handed to every handler: the store, the configured gate, and
/// the token signer
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub gate: AuthGate,
    pub jwt: Arc<JwtAuth>,
}

impl AppState {
    pub fn new(store: Arc<CatalogStore>, gate: AuthGate, jwt: Arc<JwtAuth>) -> Self {
        Self { store, gate, jwt }
    }
}
