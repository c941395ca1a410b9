use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use harmony_db::entities::user;
use harmony_db::AppState;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::extract::{JsonBody, UrlPath, UrlQuery};
use super::{MessageResponse, PaginationParams};
use crate::auth::middleware::AuthUser;
use crate::error::ApiResult;
use crate::service::identity::{
    self, ChangePasswordRequest, LoginRequest, RegisterRequest, Session, TokenSettings,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

impl From<user::Model> for UserSummary {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub message: String,
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl SessionResponse {
    fn new(message: &str, session: Session) -> Self {
        Self {
            message: message.to_string(),
            id: session.user.id,
            email: session.user.email,
            token: session.token,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

fn token_settings(state: &AppState) -> TokenSettings<'_> {
    TokenSettings {
        secret: &state.jwt_secret,
        ttl_hours: state.token_ttl_hours,
    }
}

/// POST /users/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let txn = state.db.begin().await?;
    let session = identity::register(&txn, token_settings(&state), req).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new("User Created", session)),
    ))
}

/// POST /users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = identity::login(&state.db, token_settings(&state), req).await?;
    Ok(Json(SessionResponse::new("Login Successful", session)))
}

/// POST /users/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<MessageResponse>> {
    identity::logout(&state.db, auth_user.id).await?;
    Ok(Json(MessageResponse::new("Logout Successful")))
}

/// PATCH /users/change_password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    identity::change_password(&state.db, req).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /users/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = identity::get_user(&state.db, auth_user.id).await?;
    Ok(Json(UserResponse { user: user.into() }))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = identity::get_user(&state.db, id).await?;
    Ok(Json(UserResponse { user: user.into() }))
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<PaginationParams>,
) -> ApiResult<Json<UserListResponse>> {
    let (page, page_size) = params.resolve();
    let result = identity::list_users(&state.db, page, page_size).await?;

    Ok(Json(UserListResponse {
        users: result.items.into_iter().map(UserSummary::from).collect(),
        total: result.total,
        page,
        page_size,
        total_pages: result.total.div_ceil(page_size),
    }))
}

/// DELETE /users/{id} (admin)
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    UrlPath(id): UrlPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let txn = state.db.begin().await?;
    identity::delete_user(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(admin_id = %admin.id, user_id = %id, "user removed by admin");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
