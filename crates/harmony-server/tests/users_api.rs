// Integration tests for the account endpoints and access control
mod common;

use axum::http::{Method, StatusCode};
use common::*;
use harmony_db::entities::{auth_token, profile, user};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn test_register_creates_user_profile_and_token() {
    let (app, state) = test_app().await;
    let (id, token) = register(&app, "alice@harmony.test").await;

    assert!(!token.is_empty());
    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(profile::Entity::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(auth_token::Entity::find().count(&state.db).await.unwrap(), 1);

    let (status, body) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id.to_string());
    assert_eq!(body["user"]["email"], "alice@harmony.test");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (app, state) = test_app().await;
    register(&app, "bob@harmony.test").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({
            "email": "bob@HARMONY.test",
            "password": STRONG_PASSWORD,
            "confirm_password": STRONG_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists.");
    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_rejects_bad_input_in_order() {
    let (app, state) = test_app().await;

    let cases = [
        (json!({"email": "nope", "password": STRONG_PASSWORD, "confirm_password": STRONG_PASSWORD}), "Invalid email."),
        (json!({"email": "c@harmony.test", "password": "12345678", "confirm_password": "12345678"}),
         "Please enter a strong password with at least 8 characters."),
        (json!({"email": "c@harmony.test", "password": STRONG_PASSWORD, "confirm_password": "Other-Pass-99"}),
         "Password did not match"),
    ];
    for (payload, message) in cases {
        let (status, body) = send(&app, Method::POST, "/users/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], message);
    }
    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_issues_additional_tokens_and_logout_revokes_all() {
    let (app, state) = test_app().await;
    let (_, first) = register(&app, "carol@harmony.test").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "carol@harmony.test", "password": STRONG_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login Successful");
    let second = body["token"].as_str().unwrap().to_string();
    assert_eq!(auth_token::Entity::find().count(&state.db).await.unwrap(), 2);

    // both tokens are live at once
    assert_eq!(send(&app, Method::GET, "/users/me", Some(&first), None).await.0, StatusCode::OK);
    assert_eq!(send(&app, Method::GET, "/users/me", Some(&second), None).await.0, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/users/logout", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(auth_token::Entity::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(
        send(&app, Method::GET, "/users/me", Some(&first), None).await.0,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (app, _) = test_app().await;
    register(&app, "dave@harmony.test").await;

    for email in ["dave@harmony.test", "ghost@harmony.test"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": email, "password": "Wrong-Password-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid Credentials");
    }
}

#[tokio::test]
async fn test_change_password_keeps_tokens_and_swaps_credentials() {
    let (app, _) = test_app().await;
    let (_, token) = register(&app, "erin@harmony.test").await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/change_password",
        None,
        Some(json!({
            "email": "erin@harmony.test",
            "old_password": STRONG_PASSWORD,
            "new_password": "Quiet-Lantern-77",
            "confirm_password": "Quiet-Lantern-77",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(send(&app, Method::GET, "/users/me", Some(&token), None).await.0, StatusCode::OK);

    let login = |password: &'static str| {
        let app = app.clone();
        async move {
            send(
                &app,
                Method::POST,
                "/users/login",
                None,
                Some(json!({ "email": "erin@harmony.test", "password": password })),
            )
            .await
            .0
        }
    };
    assert_eq!(login(STRONG_PASSWORD).await, StatusCode::UNAUTHORIZED);
    assert_eq!(login("Quiet-Lantern-77").await, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_need_staff() {
    let (app, state) = test_app().await;
    let (user_id, token) = register(&app, "frank@harmony.test").await;

    let (status, body) = send(&app, Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You do not have permission to perform this action.");

    let uri = format!("/users/{user_id}");
    assert_eq!(send(&app, Method::DELETE, &uri, Some(&token), None).await.0, StatusCode::FORBIDDEN);
    // the same path stays readable for ordinary users
    assert_eq!(send(&app, Method::GET, &uri, Some(&token), None).await.0, StatusCode::OK);

    let admin = admin_token(&app, &state).await;
    let (status, body) = send(&app, Method::GET, "/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let (app, state) = test_app().await;
    let (user_id, token) = register(&app, "gina@harmony.test").await;
    let admin = admin_token(&app, &state).await;

    let uri = format!("/users/{user_id}");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    // only the admin remains, with its profile and token
    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(profile::Entity::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(auth_token::Entity::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(
        send(&app, Method::GET, "/users/me", Some(&token), None).await.0,
        StatusCode::UNAUTHORIZED
    );

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found.");
}

#[tokio::test]
async fn test_token_prefix_and_garbage_tokens() {
    let (app, _) = test_app().await;
    let (_, token) = register(&app, "hank@harmony.test").await;

    let request = axum::http::Request::builder()
        .uri("/users/me")
        .header("Authorization", format!("Token {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/users/me", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, Method::GET, "/nothing/here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::DELETE, "/users/register", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Invalid request method");
}

#[tokio::test]
async fn test_superuser_bootstrap_is_idempotent() {
    let (app, state) = test_app().await;
    admin_token(&app, &state).await;
    admin_token(&app, &state).await;

    let admin = user::Entity::find().one(&state.db).await.unwrap().unwrap();
    assert!(admin.is_staff);
    assert!(admin.is_superuser);
    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_missing_field_is_json_400() {
    let (app, state) = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({ "email": "una@harmony.test", "password": STRONG_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("confirm_password"));
    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
}
