use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use harmony_db::AppState;
use std::sync::Arc;
use uuid::Uuid;

use super::tokens::{extract_token, resolve};
use crate::error::ApiError;

/// The caller behind a validated token. Inserted into request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub is_staff: bool,
    /// `jti` of the token that authenticated this request
    pub token_id: Uuid,
}

fn authorization_header(request: &Request) -> Option<String> {
    request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn authenticate(state: &AppState, header: Option<String>) -> Result<AuthUser, ApiError> {
    let token = header
        .as_deref()
        .and_then(extract_token)
        .ok_or_else(|| {
            ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
        })?;

    let (user, token_id) = resolve(&state.db, token, &state.jwt_secret).await?;
    Ok(AuthUser {
        id: user.id,
        email: user.email,
        is_staff: user.is_staff,
        token_id,
    })
}

/// Middleware: require a live access token
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = authorization_header(&request);
    match authenticate(&state, header).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Middleware: require a live access token held by a staff user
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = authorization_header(&request);
    match authenticate(&state, header).await {
        Ok(user) if user.is_staff => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(user) => {
            tracing::warn!(user_id = %user.id, "non-staff user refused on admin route");
            ApiError::Forbidden("You do not have permission to perform this action.".to_string())
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware as axum_mw,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            db: sea_orm::DatabaseConnection::Disconnected,
            jwt_secret: "test-middleware-secret".to_string(),
            token_ttl_hours: 10,
        })
    }

    async fn ok_handler() -> &'static str {
        "OK"
    }

    fn auth_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/protected", get(ok_handler))
            .layer(axum_mw::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn admin_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/admin", get(ok_handler))
            .layer(axum_mw::from_fn_with_state(state.clone(), require_admin))
            .with_state(state)
    }

    async fn status_for(app: Router, header: Option<&str>, uri: &str) -> StatusCode {
        let mut req = HttpRequest::builder().uri(uri);
        if let Some(h) = header {
            req = req.header("Authorization", h);
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_require_auth_no_header() {
        let app = auth_app(test_state());
        assert_eq!(status_for(app, None, "/protected").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_auth_invalid_token() {
        let app = auth_app(test_state());
        let status = status_for(app, Some("Bearer invalid-token"), "/protected").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_auth_wrong_scheme() {
        let app = auth_app(test_state());
        let status = status_for(app, Some("Basic dXNlcjpwYXNz"), "/protected").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_admin_no_header() {
        let app = admin_app(test_state());
        assert_eq!(status_for(app, None, "/admin").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_admin_garbage_token() {
        let app = admin_app(test_state());
        let status = status_for(app, Some("Token garbage"), "/admin").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
