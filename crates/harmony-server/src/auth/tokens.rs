//! Server-side access tokens.
//!
//! Each token is a signed JWT whose `jti` names a row in `auth_tokens`.
//! Deleting the row revokes the token before its expiry.

use chrono::{Duration, Utc};
use harmony_db::entities::user;
use harmony_db::repo;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::jwt::{decode_token, encode_token, Claims};
use crate::error::{ApiError, ApiResult};

const INVALID_TOKEN: &str = "Invalid token.";

/// Pull the credential out of an `Authorization` header value. Both the
/// `Bearer` and `Token` schemes are accepted.
pub fn extract_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Record a new token for `user` and return its signed form.
pub async fn issue<C: ConnectionTrait>(
    db: &C,
    user: &user::Model,
    secret: &str,
    ttl_hours: i64,
) -> ApiResult<String> {
    let now = Utc::now();
    let expires = Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| ApiError::Internal(format!("token lifetime out of range: {ttl_hours}h")))?;
    let row = repo::tokens::create(db, user.id, expires.fixed_offset()).await?;
    let claims = Claims::new(user.id, row.id, now, expires);
    encode_token(&claims, secret)
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

/// Revoke every token `user_id` holds. Returns the number revoked.
pub async fn revoke_all<C: ConnectionTrait>(db: &C, user_id: Uuid) -> ApiResult<u64> {
    Ok(repo::tokens::delete_for_user(db, user_id).await?)
}

/// Map a presented token to its active owner.
pub async fn resolve<C: ConnectionTrait>(
    db: &C,
    token: &str,
    secret: &str,
) -> ApiResult<(user::Model, Uuid)> {
    let claims = decode_token(token, secret).map_err(|e| {
        tracing::debug!("token rejected: {e}");
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    let row = repo::tokens::find_by_id(db, claims.jti)
        .await?
        .filter(|row| row.user_id == claims.sub && !row.is_expired_at(Utc::now().fixed_offset()))
        .ok_or_else(|| ApiError::Unauthorized(INVALID_TOKEN.to_string()))?;

    let user = repo::users::find_by_id(db, row.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("User inactive or deleted.".to_string()))?;

    Ok((user, row.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_scheme() {
        assert_eq!(extract_token("Token abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        assert_eq!(extract_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_token("bearer abc"), None);
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token(""), None);
    }

    #[tokio::test]
    async fn test_issue_rejects_out_of_range_lifetime() {
        let now = chrono::Utc::now().fixed_offset();
        let user = user::Model {
            id: Uuid::new_v4(),
            email: "ttl@example.com".into(),
            password: String::new(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: now,
            created: now,
            modified: now,
        };
        let db = sea_orm::DatabaseConnection::Disconnected;
        let err = issue(&db, &user, "secret", 9_999_999_999).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
