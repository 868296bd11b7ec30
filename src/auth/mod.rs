//! Request authentication chain
//!
//! One gate guards every resource route. The variant is chosen once at
//! startup from `CATALOG_AUTH_MODE` and the variants are interchangeable:
//! each one inspects the inbound headers and either yields a `Principal`
//! or a structured failure. Missing credential material is `401`; present
//! but invalid material is `403`. Credential checks delegate to the user
//! table in the catalog store.

mod jwt;

pub use jwt::{Claims, JwtAuth, TokenPair};

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::store::CatalogStore;
use crate::types::{CatalogResult, User};

/// Custom header for the shared-header gate
pub const SHARED_HEADER: &str = "Catalog-Authorization";

/// Identity established by a successful authentication check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: i64,
}

impl Principal {
    /// Identity used when the gate is disabled
    pub fn anonymous() -> Self {
        Self {
            username: "anonymous".to_string(),
            role: 0,
        }
    }
}

/// Authentication failures
#[derive(Debug, Clone)]
pub enum AuthError {
    /// The expected credential header is absent
    MissingHeader(&'static str),
    /// The header exists but cannot be decoded into credentials
    MalformedHeader(String),
    /// Credentials decoded but do not check out
    InvalidCredentials,
    /// Token signature ok but past its expiry
    TokenExpired,
    /// Token failed signature or structural checks
    TokenInvalid(String),
    /// A refresh operation was attempted with the wrong token type
    InvalidTokenType,
    /// Token subject no longer exists in the user table
    UnknownUser,
}

impl AuthError {
    /// Absent credentials are 401; anything presented-but-rejected is 403
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::MissingHeader(_))
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader(header) => write!(f, "{} header not found", header),
            AuthError::MalformedHeader(reason) => {
                write!(f, "credential header is malformed: {}", reason)
            }
            AuthError::InvalidCredentials => write!(f, "invalid username or password"),
            AuthError::TokenExpired => write!(f, "token has expired"),
            AuthError::TokenInvalid(reason) => write!(f, "token error: {}", reason),
            AuthError::InvalidTokenType => write!(f, "invalid token type"),
            AuthError::UnknownUser => write!(f, "user not found"),
        }
    }
}

impl std::error::Error for AuthError {}

/// The configured gate variant
pub enum AuthGate {
    /// Pass-through: every request is anonymous
    Disabled,
    /// `Catalog-Authorization: username:password`, plaintext-compared
    SharedHeader,
    /// Standard `Authorization: Basic <base64(username:password)>`
    Basic,
    /// Opaque pre-shared token in `Authorization: Bearer <token>`
    Bearer { token: String },
    /// Signed, time-bound token in `Authorization: Bearer <jwt>`
    Jwt { jwt: Arc<JwtAuth> },
}

impl AuthGate {
    /// Select the gate from `CATALOG_AUTH_MODE`
    /// (none | shared-header | basic | bearer | jwt; default none).
    pub fn from_env(jwt: &Arc<JwtAuth>) -> Self {
        let mode = std::env::var("CATALOG_AUTH_MODE").unwrap_or_else(|_| "none".to_string());

        match mode.as_str() {
            "none" => AuthGate::Disabled,
            "shared-header" => AuthGate::SharedHeader,
            "basic" => AuthGate::Basic,
            "bearer" => match std::env::var("CATALOG_API_TOKEN") {
                Ok(token) if !token.is_empty() => AuthGate::Bearer { token },
                _ => {
                    eprintln!("[Auth] WARNING: CATALOG_AUTH_MODE=bearer without CATALOG_API_TOKEN, gate disabled");
                    AuthGate::Disabled
                }
            },
            "jwt" => AuthGate::Jwt { jwt: jwt.clone() },
            other => {
                eprintln!(
                    "[Auth] WARNING: unknown CATALOG_AUTH_MODE '{}', gate disabled",
                    other
                );
                AuthGate::Disabled
            }
        }
    }

    /// Human-readable variant name for startup logging
    pub fn mode_name(&self) -> &'static str {
        match self {
            AuthGate::Disabled => "none",
            AuthGate::SharedHeader => "shared-header",
            AuthGate::Basic => "basic",
            AuthGate::Bearer { .. } => "bearer",
            AuthGate::Jwt { .. } => "jwt",
        }
    }

    /// Gate one request: headers in, principal or structured failure out.
    pub fn authenticate(
        &self,
        headers: &HeaderMap,
        store: &CatalogStore,
    ) -> Result<Principal, AuthError> {
        match self {
            AuthGate::Disabled => Ok(Principal::anonymous()),

            AuthGate::SharedHeader => {
                let raw = header_str(headers, SHARED_HEADER)?;
                let (username, password) = raw.split_once(':').ok_or_else(|| {
                    AuthError::MalformedHeader("expected username:password".to_string())
                })?;
                check_credentials(store, username, password)
            }

            AuthGate::Basic => {
                let raw = header_str(headers, "Authorization")?;
                let encoded = raw.strip_prefix("Basic ").ok_or_else(|| {
                    AuthError::MalformedHeader("expected a Basic scheme".to_string())
                })?;
                let decoded = BASE64
                    .decode(encoded.trim())
                    .map_err(|e| AuthError::MalformedHeader(e.to_string()))?;
                let decoded = String::from_utf8(decoded)
                    .map_err(|e| AuthError::MalformedHeader(e.to_string()))?;
                let (username, password) = decoded.split_once(':').ok_or_else(|| {
                    AuthError::MalformedHeader("expected username:password".to_string())
                })?;
                check_credentials(store, username, password)
            }

            AuthGate::Bearer { token } => {
                let raw = header_str(headers, "Authorization")?;
                let presented = raw.strip_prefix("Bearer ").ok_or_else(|| {
                    AuthError::MalformedHeader("expected a Bearer scheme".to_string())
                })?;
                if presented == token.as_str() {
                    Ok(Principal {
                        username: "api-token".to_string(),
                        role: 4,
                    })
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            }

            AuthGate::Jwt { jwt } => {
                let raw = header_str(headers, "Authorization")?;
                let claims = jwt.validate_authorization(raw)?;
                if claims.token_type != "access" {
                    return Err(AuthError::InvalidTokenType);
                }
                Ok(Principal {
                    username: claims.sub,
                    role: claims.role,
                })
            }
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, AuthError> {
    let value = headers.get(name).ok_or(AuthError::MissingHeader(name))?;
    value
        .to_str()
        .map_err(|e| AuthError::MalformedHeader(e.to_string()))
}

/// Verify a username/password pair against the user table
pub fn check_credentials(
    store: &CatalogStore,
    username: &str,
    password: &str,
) -> Result<Principal, AuthError> {
    let user = store
        .find_user(username)
        .ok_or(AuthError::InvalidCredentials)?;

    if bcrypt::verify(password, &user.password).unwrap_or(false) {
        Ok(Principal {
            username: user.username,
            role: user.role,
        })
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Seed the user table from `CATALOG_USERS` when it is empty.
///
/// Format: comma-separated `username:password[:role]` entries; role
/// defaults to 1. Passwords are bcrypt-hashed before they land in the
/// store.
pub fn seed_users_from_env(store: &CatalogStore) -> CatalogResult<()> {
    if !store.read().users.is_empty() {
        return Ok(());
    }

    let users_str = match std::env::var("CATALOG_USERS") {
        Ok(s) => s,
        Err(_) => return Ok(()),
    };

    let mut seeded = 0usize;
    store.mutate(|data| {
        for (index, entry) in users_str.split(',').enumerate() {
            let parts: Vec<&str> = entry.trim().split(':').collect();
            if parts.len() < 2 {
                eprintln!("[Auth] Skipping malformed CATALOG_USERS entry '{}'", entry);
                continue;
            }

            let username = parts[0].to_string();
            let password = bcrypt::hash(parts[1], bcrypt::DEFAULT_COST)
                .map_err(|e| crate::catalog::RepoError::Storage(e.to_string()))?;
            let role = parts
                .get(2)
                .and_then(|raw| raw.parse::<i64>().ok())
                .unwrap_or(1);

            data.users.push(User {
                id: index as i64 + 1,
                name: username.clone(),
                email: format!("{}@catalog.local", username),
                username,
                password,
                role,
            });
            seeded += 1;
        }
        Ok(())
    })?;

    eprintln!("[Auth] Seeded {} users", seeded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    static TEST_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

    fn store_with_user(username: &str, password: &str) -> CatalogStore {
        let id = TEST_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "catalog_auth_test_{}_{}",
            std::process::id(),
            id
        ));
        let store =
            CatalogStore::with_file_path(dir.join("catalog.json").to_string_lossy().to_string());
        store
            .mutate(|data| {
                data.users.push(User {
                    id: 1,
                    name: username.to_string(),
                    email: format!("{}@example.com", username),
                    username: username.to_string(),
                    password: bcrypt::hash(password, 4).unwrap(),
                    role: 2,
                });
                Ok(())
            })
            .unwrap();
        store
    }

    fn basic_header(username: &str, password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let encoded = BASE64.encode(format!("{}:{}", username, password));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_disabled_gate_passes_anonymous() {
        let store = store_with_user("alice", "password123");
        let gate = AuthGate::Disabled;

        let principal = gate.authenticate(&HeaderMap::new(), &store).unwrap();
        assert_eq!(principal, Principal::anonymous());
    }

    #[test]
    fn test_basic_gate_missing_header_is_unauthorized() {
        let store = store_with_user("alice", "password123");
        let gate = AuthGate::Basic;

        let err = gate.authenticate(&HeaderMap::new(), &store).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_basic_gate_wrong_password_is_forbidden() {
        let store = store_with_user("bob", "rightpass");
        let gate = AuthGate::Basic;

        let err = gate
            .authenticate(&basic_header("bob", "wrong"), &store)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_basic_gate_accepts_valid_credentials() {
        let store = store_with_user("alice", "password123");
        let gate = AuthGate::Basic;

        let principal = gate
            .authenticate(&basic_header("alice", "password123"), &store)
            .unwrap();
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.role, 2);
    }

    #[test]
    fn test_shared_header_gate() {
        let store = store_with_user("carol", "hunter2");
        let gate = AuthGate::SharedHeader;

        let mut headers = HeaderMap::new();
        headers.insert(SHARED_HEADER, HeaderValue::from_static("carol:hunter2"));
        assert!(gate.authenticate(&headers, &store).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(SHARED_HEADER, HeaderValue::from_static("no-colon-here"));
        assert!(matches!(
            gate.authenticate(&headers, &store),
            Err(AuthError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_bearer_gate_compares_presented_token() {
        let store = store_with_user("dave", "pw");
        let gate = AuthGate::Bearer {
            token: "sesame".to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer sesame"));
        assert!(gate.authenticate(&headers, &store).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer wrong"));
        assert!(matches!(
            gate.authenticate(&headers, &store),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_jwt_gate_accepts_access_token_only() {
        let store = store_with_user("erin", "pw");
        let jwt = Arc::new(JwtAuth::new(
            "test-secret-key-that-is-at-least-32-characters-long",
        ));
        let gate = AuthGate::Jwt { jwt: jwt.clone() };

        let tokens = jwt.generate_tokens("erin", 3).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", tokens.access_token)).unwrap(),
        );
        let principal = gate.authenticate(&headers, &store).unwrap();
        assert_eq!(principal.username, "erin");
        assert_eq!(principal.role, 3);

        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", tokens.refresh_token)).unwrap(),
        );
        assert!(matches!(
            gate.authenticate(&headers, &store),
            Err(AuthError::InvalidTokenType)
        ));
    }
}
