// HiringHelper Control Plane Library
// Decision: Router assembly lives in the library so the binary and the HTTP tests
// run the same app
// Decision: Front-end pages are the fallback service, wrapped by the route guard

use std::path::Path;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

// API routes and types
pub mod api;

// Authentication module
pub mod auth;

// Environment configuration
pub mod config;

// Graceful shutdown
pub mod shutdown;

// Storage layer
pub mod storage;

use api::{health::HealthState, users::UsersState, ErrorResponse};
use auth::{require_session, AuthState, PageGuard};
use config::ServerConfig;

/// Build the complete application router
pub fn build_app(config: &ServerConfig, auth_state: AuthState) -> Router {
    let db = auth_state.db.clone();

    let users_state = UsersState {
        db: db.clone(),
        auth: auth_state.clone(),
    };

    let mut api_routes = Router::new()
        .merge(auth::routes(auth_state.clone()))
        .merge(api::dashboard::routes(auth_state.clone()))
        .merge(api::users::routes(users_state));

    // Without a prefix an API fallback would swallow every page request
    if !config.api_prefix.is_empty() {
        api_routes = api_routes.fallback(api_not_found);
    }

    let guard = PageGuard::new(auth_state, config.api_prefix.clone());
    let pages = pages_router(config.ui_dist_dir.as_deref())
        .layer(middleware::from_fn_with_state(guard, require_session));

    // Health is not prefixed
    let app = Router::new()
        .merge(api::health::routes(HealthState { db }))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .fallback_service(pages);

    // Add CORS layer only if origins are configured
    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

/// Front-end pages: the built bundle when configured (unknown paths get
/// index.html so client-side routes resolve), otherwise a plain 404
fn pages_router(ui_dist_dir: Option<&Path>) -> Router {
    match ui_dist_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            Router::new().fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => Router::new().fallback(page_not_found),
    }
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

async fn page_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/auth/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
