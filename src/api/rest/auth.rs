//! Token endpoints
//!
//! Sit outside the gated resource group so clients can obtain a token
//! with username/password before hitting the catalog.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::super::state::AppState;
use crate::auth::{check_credentials, AuthError};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/token - exchange credentials for a token pair
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> Response {
    match check_credentials(&state.store, &request.username, &request.password) {
        Ok(principal) => {
            match state.jwt.generate_tokens(&principal.username, principal.role) {
                Ok(pair) => Json(pair).into_response(),
                Err(err) => err.into_response(),
            }
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /auth/refresh - exchange a refresh token for a fresh pair
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Response {
    let claims = match state.jwt.validate_token(&request.refresh_token) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    if claims.token_type != "refresh" {
        return AuthError::InvalidTokenType.into_response();
    }

    // Re-read the user so a refreshed token carries the current role.
    let user = match state.store.find_user(&claims.sub) {
        Some(user) => user,
        None => return AuthError::UnknownUser.into_response(),
    };

    match state.jwt.generate_tokens(&user.username, user.role) {
        Ok(pair) => Json(pair).into_response(),
        Err(err) => err.into_response(),
    }
}
