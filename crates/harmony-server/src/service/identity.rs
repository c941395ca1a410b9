//! Accounts and credentials: registration, login, logout, password change,
//! deletion cascade and superuser bootstrap.

use harmony_db::entities::user;
use harmony_db::repo::{self, profiles::ProfileFields, users::NewUser, Page};
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{password, tokens};
use crate::error::{ApiError, ApiResult};
use crate::validation::{normalize_email, validate_email, validate_password_for};

pub const INVALID_EMAIL: &str = "Invalid email.";
pub const USER_EXISTS: &str = "User already exists.";
pub const WEAK_PASSWORD: &str = "Please enter a strong password with at least 8 characters.";
pub const PASSWORD_MISMATCH: &str = "Password did not match";
pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";
pub const USER_NOT_FOUND: &str = "User not found.";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// A user together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub token: String,
}

/// Settings the identity operations need from application state.
#[derive(Debug, Clone, Copy)]
pub struct TokenSettings<'a> {
    pub secret: &'a str,
    pub ttl_hours: i64,
}

fn hash(password: &str) -> ApiResult<String> {
    password::hash_password(password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

fn checked_email(raw: &str) -> ApiResult<String> {
    let email = normalize_email(raw);
    if validate_email(&email) {
        Ok(email)
    } else {
        Err(ApiError::Validation(INVALID_EMAIL.to_string()))
    }
}

async fn insert_user<C: ConnectionTrait>(db: &C, new: NewUser) -> ApiResult<user::Model> {
    let user = repo::users::create(db, new).await.map_err(|e| match ApiError::from(e) {
        // Lost a race with a concurrent registration.
        ApiError::Conflict(_) => ApiError::Conflict(USER_EXISTS.to_string()),
        other => other,
    })?;
    repo::profiles::create(db, user.id, ProfileFields::default()).await?;
    Ok(user)
}

/// Create a user, its empty profile and a first token.
pub async fn register<C: ConnectionTrait>(
    db: &C,
    settings: TokenSettings<'_>,
    req: RegisterRequest,
) -> ApiResult<Session> {
    let email = checked_email(&req.email)?;
    if repo::users::email_exists(db, &email).await? {
        return Err(ApiError::Conflict(USER_EXISTS.to_string()));
    }
    if !validate_password_for(&email, &req.password) {
        return Err(ApiError::Validation(WEAK_PASSWORD.to_string()));
    }
    if req.password != req.confirm_password {
        return Err(ApiError::Validation(PASSWORD_MISMATCH.to_string()));
    }

    let user = insert_user(
        db,
        NewUser {
            email,
            password_hash: hash(&req.password)?,
            is_staff: false,
            is_superuser: false,
        },
    )
    .await?;
    let token = tokens::issue(db, &user, settings.secret, settings.ttl_hours).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Session { user, token })
}

pub async fn login<C: ConnectionTrait>(
    db: &C,
    settings: TokenSettings<'_>,
    req: LoginRequest,
) -> ApiResult<Session> {
    let email = checked_email(&req.email)?;
    let Some(user) = repo::users::find_by_email(db, &email).await? else {
        password::burn_verification();
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    if !password::password_matches(&req.password, &user.password) || !user.is_active {
        tracing::info!(user_id = %user.id, "login refused");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = tokens::issue(db, &user, settings.secret, settings.ttl_hours).await?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Session { user, token })
}

/// Revoke every token the user holds.
pub async fn logout<C: ConnectionTrait>(db: &C, user_id: Uuid) -> ApiResult<u64> {
    let revoked = tokens::revoke_all(db, user_id).await?;
    tracing::info!(user_id = %user_id, revoked, "user logged out");
    Ok(revoked)
}

/// Existing tokens stay valid after the change.
pub async fn change_password<C: ConnectionTrait>(
    db: &C,
    req: ChangePasswordRequest,
) -> ApiResult<user::Model> {
    let email = checked_email(&req.email)?;
    let Some(user) = repo::users::find_by_email(db, &email).await? else {
        password::burn_verification();
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    if !password::password_matches(&req.old_password, &user.password) {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }
    if req.new_password != req.confirm_password {
        return Err(ApiError::Validation(
            "New password and confirm password must match.".to_string(),
        ));
    }
    if !validate_password_for(&email, &req.new_password) {
        return Err(ApiError::Validation(WEAK_PASSWORD.to_string()));
    }

    let user = repo::users::set_password(db, user, hash(&req.new_password)?).await?;
    tracing::info!(user_id = %user.id, "password changed");
    Ok(user)
}

/// Remove the user's tokens, then its profile, then the user.
pub async fn delete_user<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<()> {
    let user = repo::users::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    tokens::revoke_all(db, user.id).await?;
    repo::profiles::delete_for_user(db, user.id).await?;
    repo::users::delete(db, user).await?;

    tracing::info!(user_id = %id, "user deleted");
    Ok(())
}

pub async fn get_user<C: ConnectionTrait>(db: &C, id: Uuid) -> ApiResult<user::Model> {
    repo::users::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))
}

pub async fn list_users<C: ConnectionTrait>(
    db: &C,
    page: u64,
    page_size: u64,
) -> ApiResult<Page<user::Model>> {
    Ok(repo::users::list(db, page, page_size).await?)
}

/// Insert a staff superuser unless the email is already taken. Returns the
/// new user, or `None` when nothing was created.
pub async fn create_superuser<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
) -> ApiResult<Option<user::Model>> {
    let email = checked_email(email)?;
    if repo::users::email_exists(db, &email).await? {
        return Ok(None);
    }
    if !validate_password_for(&email, password) {
        return Err(ApiError::Validation(WEAK_PASSWORD.to_string()));
    }

    let user = insert_user(
        db,
        NewUser {
            email,
            password_hash: hash(password)?,
            is_staff: true,
            is_superuser: true,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, "superuser created");
    Ok(Some(user))
}
