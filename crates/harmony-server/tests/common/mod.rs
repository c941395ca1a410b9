// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use harmony_db::{AppState, DatabaseConfig};
use harmony_migration::Migrator;
use harmony_server::{build_router, RouterOptions};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-testing-only";
pub const STRONG_PASSWORD: &str = "Violet-Harbor-42";
pub const ADMIN_EMAIL: &str = "root@harmony.test";

/// Fresh in-memory database with every migration applied.
pub async fn test_app_state() -> Arc<AppState> {
    let db = harmony_db::connect(&DatabaseConfig::sqlite_memory())
        .await
        .expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    Arc::new(AppState {
        db,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_hours: 10,
    })
}

pub async fn test_app() -> (Router, Arc<AppState>) {
    let state = test_app_state().await;
    let app = build_router(state.clone(), &RouterOptions::default());
    (app, state)
}

/// Send one request and decode the JSON body (null when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register through the API and return (user id, token).
pub async fn register(app: &Router, email: &str) -> (Uuid, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/users/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": STRONG_PASSWORD,
            "confirm_password": STRONG_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let id = body["id"].as_str().unwrap().parse().unwrap();
    (id, body["token"].as_str().unwrap().to_string())
}

/// Bootstrap the superuser and log in as it.
pub async fn admin_token(app: &Router, state: &AppState) -> String {
    harmony_server::bootstrap_superuser(
        state,
        &harmony_server::config::AdminBootstrap {
            email: ADMIN_EMAIL.to_string(),
            password: STRONG_PASSWORD.to_string(),
        },
    )
    .await
    .unwrap();

    let (status, body) = send(
        app,
        Method::POST,
        "/users/login",
        None,
        Some(serde_json::json!({ "email": ADMIN_EMAIL, "password": STRONG_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_artist(app: &Router, token: &str, name: &str) -> Uuid {
    let (status, body) = send(
        app,
        Method::POST,
        "/artists",
        Some(token),
        Some(serde_json::json!({ "name": name, "first_release_year": 1999 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create artist failed: {body}");
    body["artist"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_music(app: &Router, token: &str, title: &str, artists: &[Uuid]) -> Value {
    send(
        app,
        Method::POST,
        "/musics",
        Some(token),
        Some(serde_json::json!({ "title": title, "artist_ids": artists })),
    )
    .await
    .1
}
