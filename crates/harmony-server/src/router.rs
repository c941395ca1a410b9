use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Json, Router,
};
use harmony_db::AppState;
use serde::Serialize;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::{artists, musics, profiles, users};
use crate::auth::middleware::{require_admin, require_auth};
use crate::config::ServerConfig;
use crate::error::{ApiError, ErrorResponse};

/// Router knobs that come from configuration.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub cors_origins: Vec<String>,
    /// Throttle the credential endpoints per client IP. Needs the server to
    /// be started with connect info.
    pub rate_limit: bool,
}

impl From<&ServerConfig> for RouterOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            cors_origins: config.cors_origins.clone(),
            rate_limit: config.rate_limit_enabled,
        }
    }
}

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> (axum::http::StatusCode, Json<ErrorResponse>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "Not found.".to_string(),
        }),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    if origins.is_empty() {
        tracing::warn!("CORS_ORIGINS not set, cross-origin requests will be refused");
        return CorsLayer::new().allow_methods(methods);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    tracing::info!("CORS allowed origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(tower_http::cors::Any)
}

pub fn build_router(state: Arc<AppState>, options: &RouterOptions) -> Router {
    let mut credentials = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login));

    if options.rate_limit {
        // 10 requests burst, one token back every 6 seconds, per IP
        match GovernorConfigBuilder::default()
            .per_second(6)
            .burst_size(10)
            .finish()
        {
            Some(conf) => credentials = credentials.layer(GovernorLayer::new(Arc::new(conf))),
            None => tracing::error!("invalid rate limiter settings, credential routes unthrottled"),
        }
    }

    let public = Router::new()
        .route("/users/change_password", patch(users::change_password))
        .route("/healthz", get(healthz));

    let authenticated = Router::new()
        .route("/users/logout", post(users::logout))
        .route("/users/me", get(users::me))
        .route("/users/{id}", get(users::get_user))
        .route(
            "/profiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/profiles/{id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .patch(profiles::update_profile),
        )
        .route(
            "/artists",
            get(artists::list_artists).post(artists::create_artist),
        )
        .route(
            "/artists/{id}",
            get(artists::get_artist)
                .put(artists::update_artist)
                .patch(artists::update_artist)
                .delete(artists::delete_artist),
        )
        .route("/musics", get(musics::list_musics).post(musics::create_music))
        .route(
            "/musics/{id}",
            get(musics::get_music)
                .put(musics::update_music)
                .patch(musics::update_music),
        )
        .route(
            "/musics/by_artist/{artist_id}",
            get(musics::musics_by_artist),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let admin = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", axum::routing::delete(users::delete_user))
        .route("/musics/{id}", axum::routing::delete(musics::delete_music))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(credentials)
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.cors_origins))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = Arc::new(AppState {
            db: sea_orm::DatabaseConnection::Disconnected,
            jwt_secret: "router-test-secret".to_string(),
            token_ttl_hours: 10,
        });
        build_router(state, &RouterOptions::default())
    }

    async fn call(method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, body) = call(Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = call(Method::GET, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not found.");
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_405() {
        let (status, body) = call(Method::GET, "/users/register").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "Invalid request method");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (status, _) = call(Method::GET, "/artists").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_route_requires_token() {
        let (status, _) = call(Method::GET, "/users").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let resp = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
        assert_eq!(resp.headers()["x-frame-options"], "DENY");
    }
}
