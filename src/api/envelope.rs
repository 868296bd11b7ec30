//! Response envelopes
//!
//! Every response leaves through one of these shapes: the list envelope
//! (serialized straight from `ListPage`), a `{status, data}` pair for
//! mutations, a bare `{status}` for deletes and simple failures, or
//! `{status, errors}` for validation failures. The `IntoResponse` impls
//! below are the only place error kinds meet status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::auth::AuthError;
use crate::catalog::RepoError;
use crate::validation::ValidationErrors;

/// Success envelope for create/update
#[derive(Debug, Serialize)]
pub struct MutationEnvelope {
    pub status: String,
    pub data: Value,
}

impl MutationEnvelope {
    pub fn new(status: impl Into<String>, data: Value) -> Self {
        Self {
            status: status.into(),
            data,
        }
    }
}

/// Bare status envelope for deletes and simple failures
#[derive(Debug, Serialize)]
pub struct StatusEnvelope {
    pub status: String,
}

impl StatusEnvelope {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Failure envelope carrying the per-field error map
#[derive(Debug, Serialize)]
pub struct ValidationEnvelope {
    pub status: String,
    pub errors: ValidationErrors,
}

impl IntoResponse for RepoError {
    fn into_response(self) -> Response {
        match self {
            RepoError::NotFound { .. } | RepoError::UnknownRelation { .. } => (
                StatusCode::NOT_FOUND,
                Json(StatusEnvelope::new(self.to_string())),
            )
                .into_response(),
            RepoError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationEnvelope {
                    status: "Validation failed".to_string(),
                    errors,
                }),
            )
                .into_response(),
            RepoError::Sort(_) | RepoError::UnknownSortColumn { .. } | RepoError::Malformed(_) => (
                StatusCode::BAD_REQUEST,
                Json(StatusEnvelope::new(self.to_string())),
            )
                .into_response(),
            RepoError::Conflict(_) => (
                StatusCode::CONFLICT,
                Json(StatusEnvelope::new(self.to_string())),
            )
                .into_response(),
            RepoError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusEnvelope::new(self.to_string())),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = if self.is_unauthorized() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::FORBIDDEN
        };
        (code, Json(StatusEnvelope::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = RepoError::NotFound {
            resource: "Platform",
            id: 9,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_422() {
        let mut errors = ValidationErrors::new();
        errors.insert("title".to_string(), "must be a non-empty string".to_string());
        let response = RepoError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_auth_split_between_401_and_403() {
        let response = AuthError::MissingHeader("Authorization").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
