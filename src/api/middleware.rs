//! Authentication middleware
//!
//! Applied to the resource route group only; the welcome, health, and
//! token-issuing routes stay open.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::state::AppState;

/// Gate the request before any resource handler runs
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    match state.gate.authenticate(request.headers(), &state.store) {
        Ok(_principal) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}
