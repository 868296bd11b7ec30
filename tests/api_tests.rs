//! End-to-end API tests
//!
//! Drive the full router with `tower::ServiceExt::oneshot`: pagination
//! envelopes, validation failures, and every gate variant's status codes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use game_catalog::api::{create_router, AppState};
use game_catalog::auth::{AuthGate, JwtAuth};
use game_catalog::store::CatalogStore;
use game_catalog::types::User;

const JWT_SECRET: &str = "test-secret-key-that-is-at-least-32-characters-long";

fn test_store() -> Arc<CatalogStore> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    // Leak the tempdir so the store's file outlives the test setup.
    std::mem::forget(dir);
    Arc::new(CatalogStore::with_file_path(
        path.to_string_lossy().to_string(),
    ))
}

fn app_with_gate(store: Arc<CatalogStore>, gate: AuthGate) -> axum::Router {
    let jwt = Arc::new(JwtAuth::new(JWT_SECRET));
    create_router(Arc::new(AppState::new(store, gate, jwt)))
}

fn seed_platforms(store: &CatalogStore, count: i64) {
    store
        .mutate(|data| {
            for i in 1..=count {
                data.platforms.push(
                    serde_json::from_value(json!({
                        "platform_id": i,
                        "platform_name": format!("Platform {:02}", i),
                        "form_factor": "Console",
                        "generation": i,
                        "release_year": 2000,
                        "is_backwards_compatible": false
                    }))
                    .unwrap(),
                );
            }
            Ok(())
        })
        .unwrap();
}

fn seed_user(store: &CatalogStore, username: &str, password: &str) {
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
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost:3000")
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "localhost:3000")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_platforms_sorted_and_paginated() {
    let store = test_store();
    seed_platforms(&store, 12);
    let app = app_with_gate(store, AuthGate::Disabled);

    let response = app
        .oneshot(get(
            "/api/v1/platforms?limit=5&offset=0&sort=%5Bgeneration:desc%5D",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalCount"], json!(12));
    assert_eq!(body["limit"], json!(5));
    assert_eq!(body["offset"], json!(0));
    assert_eq!(body["sort"], json!({ "generation": "desc" }));

    let generations: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["generation"].as_i64().unwrap())
        .collect();
    assert_eq!(generations, vec![12, 11, 10, 9, 8]);

    let links = body["links"].as_array().unwrap();
    let rels: Vec<&str> = links.iter().map(|l| l["rel"].as_str().unwrap()).collect();
    assert!(rels.contains(&"next"));
    assert!(!rels.contains(&"prev"));

    let next = links.iter().find(|l| l["rel"] == "next").unwrap();
    assert_eq!(
        next["href"],
        json!("http://localhost:3000/api/v1/platforms?limit=5&offset=5")
    );
}

#[tokio::test]
async fn test_search_bypasses_pagination_and_sort() {
    let store = test_store();
    seed_platforms(&store, 12);
    let app = app_with_gate(store, AuthGate::Disabled);

    let response = app
        .oneshot(get("/api/v1/platforms?q=platform&limit=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A bare match array: no envelope, no page window.
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_numeric_search_is_range_match() {
    let store = test_store();
    seed_platforms(&store, 12);
    let app = app_with_gate(store, AuthGate::Disabled);

    // Every seeded platform has release_year 2000, so the inclusive
    // lower bound matches all of them.
    let response = app.oneshot(get("/api/v1/platforms?q=2000")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 12);

    let store = test_store();
    seed_platforms(&store, 12);
    let app = app_with_gate(store, AuthGate::Disabled);
    let response = app.oneshot(get("/api/v1/platforms?q=2001")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_category_validation_envelope() {
    let app = app_with_gate(test_store(), AuthGate::Disabled);

    let response = app
        .oneshot(post(
            "/api/v1/categories",
            json!({ "category_name": "", "description": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("Validation failed"));

    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("category_name"));
}

#[tokio::test]
async fn test_create_and_fetch_platform() {
    let app = app_with_gate(test_store(), AuthGate::Disabled);

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/platforms",
            json!({
                "platform_name": "Dreamcast",
                "form_factor": "Console",
                "generation": 6,
                "release_year": 1998,
                "is_backwards_compatible": 0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("Platform has been created"));
    assert_eq!(body["data"]["platform_id"], json!(1));

    let response = app.oneshot(get("/api/v1/platforms/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["platform_name"], json!("Dreamcast"));
}

#[tokio::test]
async fn test_missing_row_is_404_envelope() {
    let app = app_with_gate(test_store(), AuthGate::Disabled);

    let response = app.oneshot(get("/api/v1/platforms/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("Platform 42 not found"));
}

#[tokio::test]
async fn test_unknown_sort_column_is_400() {
    let store = test_store();
    seed_platforms(&store, 3);
    let app = app_with_gate(store, AuthGate::Disabled);

    let response = app
        .oneshot(get("/api/v1/platforms?sort=%5Bprice:asc%5D"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_basic_gate_status_codes() {
    let store = test_store();
    seed_user(&store, "bob", "rightpass");
    seed_platforms(&store, 2);
    let app = app_with_gate(store, AuthGate::Basic);

    // No header at all: 401.
    let response = app
        .clone()
        .oneshot(get("/api/v1/platforms"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong password: present but invalid, so 403.
    let credentials = BASE64.encode("bob:wrong");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/platforms")
                .header(header::HOST, "localhost:3000")
                .header(header::AUTHORIZATION, format!("Basic {}", credentials))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Correct credentials: through the gate.
    let credentials = BASE64.encode("bob:rightpass");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/platforms")
                .header(header::HOST, "localhost:3000")
                .header(header::AUTHORIZATION, format!("Basic {}", credentials))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_endpoint_and_jwt_gate() {
    let store = test_store();
    seed_user(&store, "alice", "password123");
    seed_platforms(&store, 1);
    let jwt = Arc::new(JwtAuth::new(JWT_SECRET));
    let state = Arc::new(AppState::new(
        store,
        AuthGate::Jwt { jwt: jwt.clone() },
        jwt,
    ));
    let app = create_router(state);

    // Wrong password never yields a token.
    let response = app
        .clone()
        .oneshot(post(
            "/auth/token",
            json!({ "username": "alice", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Correct credentials yield an access/refresh pair.
    let response = app
        .clone()
        .oneshot(post(
            "/auth/token",
            json!({ "username": "alice", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = body_json(response).await;
    let access_token = tokens["access_token"].as_str().unwrap().to_string();

    // The access token opens the gate.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/platforms")
                .header(header::HOST, "localhost:3000")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A garbage token does not.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/platforms")
                .header(header::HOST, "localhost:3000")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_relation_route() {
    let store = test_store();
    store
        .mutate(|data| {
            data.publishers.push(
                serde_json::from_value(json!({
                    "publisher_id": 1,
                    "publisher_name": "Nintendo",
                    "country": "Japan",
                    "founded_year": 1985,
                    "website_url": null,
                    "active_status": true
                }))
                .unwrap(),
            );
            data.videogames.push(
                serde_json::from_value(json!({
                    "videogame_id": 1,
                    "publisher_id": 1,
                    "title": "Mario Kart",
                    "release_year": 2017,
                    "esrb_rating": "E",
                    "game_description": "Racing",
                    "is_multiplayer": true
                }))
                .unwrap(),
            );
            Ok(())
        })
        .unwrap();
    let app = app_with_gate(store, AuthGate::Disabled);

    let response = app
        .clone()
        .oneshot(get("/api/v1/publishers/1/videogames"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], json!("Mario Kart"));

    // Undeclared relation names are 404, not empty lists.
    let response = app
        .oneshot(get("/api/v1/publishers/1/platforms"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_welcome_route() {
    let app = app_with_gate(test_store(), AuthGate::Disabled);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
