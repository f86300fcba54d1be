// Route guard for front-end pages
// Decision: Guard runs server-side in front of the page fallback, so protected
// pages are never served to a visitor without a live session
// Decision: Unauthenticated visitors get 303 to /login?redirect=<original path>

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::middleware::{token_from_headers, AuthState};

/// Login page that unauthenticated visitors are sent to
pub const LOGIN_PATH: &str = "/login";

/// State for the page guard
#[derive(Clone)]
pub struct PageGuard {
    pub auth: AuthState,
    /// Normalized API prefix; API paths are never redirected
    pub api_prefix: String,
}

impl PageGuard {
    pub fn new(auth: AuthState, api_prefix: impl Into<String>) -> Self {
        Self {
            auth,
            api_prefix: api_prefix.into(),
        }
    }

    /// Paths that pass without a session
    pub fn is_exempt(&self, path: &str) -> bool {
        self.auth.config.is_public_route(path)
            || path == "/health"
            || self.is_api_path(path)
            || is_static_asset(path)
    }

    fn is_api_path(&self, path: &str) -> bool {
        if self.api_prefix.is_empty() {
            return false;
        }
        path == self.api_prefix
            || path
                .strip_prefix(self.api_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    async fn has_session(&self, headers: &HeaderMap) -> bool {
        let Some(token) = token_from_headers(headers, &self.auth.config) else {
            return false;
        };
        match self.auth.load_session_user(&token).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                tracing::debug!("Session token refers to a deleted user");
                false
            }
            Err(_) => false,
        }
    }
}

/// File extensions served to visitors without a session
const ASSET_EXTENSIONS: &[&str] = &[
    "js", "mjs", "css", "map", "ico", "png", "jpg", "jpeg", "gif", "svg", "webp", "avif",
    "woff", "woff2", "ttf", "otf", "eot", "txt", "xml", "webmanifest",
];

/// Build assets and well-known public files (favicon.ico, robots.txt, ...).
/// Other dotted segments ("/candidates/john.doe") are pages and stay guarded.
fn is_static_asset(path: &str) -> bool {
    if path.starts_with("/_nuxt/") {
        return true;
    }
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && ASSET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Login URL that brings the visitor back to `target` afterwards
pub fn login_redirect_location(target: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, urlencoding::encode(target))
}

/// Middleware: let exempt paths and authenticated visitors through, redirect
/// everyone else to the login page
pub async fn require_session(
    State(guard): State<PageGuard>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if guard.is_exempt(path) || guard.has_session(request.headers()).await {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    tracing::debug!(path = %path, "Redirecting unauthenticated page request to login");

    Redirect::to(&login_redirect_location(target)).into_response()
}
