// Authentication middleware and extractors
// Decision: Support both cookie-based (UI) and header-based (API) auth
// Decision: A Bearer header, when present, takes precedence over the cookie

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use bson::oid::ObjectId;
use serde::Serialize;
use std::sync::Arc;

use super::{
    config::AuthConfig,
    cookie::get_auth_cookie,
    jwt::{Claims, JwtService},
};
use crate::api::ErrorResponse;
use crate::storage::{StorageBackend, StorageError, UserDocument};

/// Authentication error, rendered as `{ "error": "..." }`
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            error: message.to_string(),
            status,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Generic 500; the cause is logged by the caller, never returned
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Map a storage failure to a response, logging the cause
pub fn storage_error(context: &str, err: StorageError) -> AuthError {
    match err {
        StorageError::DuplicateEmail => {
            AuthError::conflict("User with this email already exists")
        }
        other => {
            tracing::error!("{}: {}", context, other);
            AuthError::internal()
        }
    }
}

/// Authenticated user context extracted from request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User document id
    pub id: ObjectId,
    /// User email at the time the token was issued
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| AuthError::unauthorized("Invalid or expired token"))?;
        Ok(Self {
            id,
            email: claims.email,
        })
    }
}

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub jwt_service: Arc<JwtService>,
    pub db: Arc<StorageBackend>,
}

impl AuthState {
    pub fn new(config: AuthConfig, db: Arc<StorageBackend>) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config: Arc::new(config),
            jwt_service,
            db,
        }
    }

    /// Verify a token and return the user it identifies
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.jwt_service.verify(token).map_err(|e| {
            tracing::debug!("JWT validation failed: {:#}", e);
            AuthError::unauthorized("Invalid or expired token")
        })?;
        AuthUser::try_from(claims)
    }

    /// Verify a token and load the user document it points to.
    /// Returns Ok(None) when the token is valid but the user no longer exists.
    pub async fn load_session_user(&self, token: &str) -> Result<Option<UserDocument>, AuthError> {
        let auth_user = self.authenticate(token)?;
        self.db
            .get_user(&auth_user.id)
            .await
            .map_err(|e| storage_error("Database error during session lookup", e))
    }
}

/// Find the session token on a request: `Authorization: Bearer` first, then the cookie
pub fn token_from_headers(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Some(token) = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            return Some(token.to_string());
        }
    }

    let jar = CookieJar::from_headers(headers);
    get_auth_cookie(&jar, &config.cookie)
}

/// Extractor for authenticated user
/// This is required - returns 401 if not authenticated
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let token = token_from_headers(&parts.headers, &auth_state.config)
            .ok_or_else(|| AuthError::unauthorized("Authentication required"))?;
        auth_state.authenticate(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::JwtConfig;
    use axum::http::HeaderValue;

    #[test]
    fn test_auth_error() {
        let error = AuthError::unauthorized("Test error");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.error, "Test error");

        assert_eq!(AuthError::bad_request("x").status, StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::conflict("x").status, StatusCode::CONFLICT);
        assert_eq!(AuthError::not_found("x").status, StatusCode::NOT_FOUND);

        let internal = AuthError::internal();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.error, "Internal server error");
    }

    #[test]
    fn test_auth_error_body_has_no_status() {
        let json = serde_json::to_value(AuthError::unauthorized("Nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Nope" }));
    }

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let err = storage_error("ctx", StorageError::DuplicateEmail);
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.error, "User with this email already exists");
    }

    #[test]
    fn test_token_from_bearer_header() {
        let config = AuthConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=cookie-token"));

        assert_eq!(
            token_from_headers(&headers, &config),
            Some("header-token".to_string())
        );
    }

    #[test]
    fn test_token_from_cookie() {
        let config = AuthConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=cookie-token"));
        assert_eq!(
            token_from_headers(&headers, &config),
            Some("cookie-token".to_string())
        );

        // A non-bearer Authorization header falls through to the cookie
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(
            token_from_headers(&headers, &config),
            Some("cookie-token".to_string())
        );
    }

    #[test]
    fn test_no_token() {
        let config = AuthConfig::default();
        assert_eq!(token_from_headers(&HeaderMap::new(), &config), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(token_from_headers(&headers, &config), None);
    }

    #[test]
    fn test_authenticate() {
        let state = AuthState::new(
            AuthConfig {
                jwt: JwtConfig {
                    secret: "secret".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            Arc::new(StorageBackend::in_memory()),
        );

        let id = ObjectId::new();
        let token = state.jwt_service.issue(&id, "a@example.com").unwrap();
        let user = state.authenticate(&token).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@example.com");

        let err = state.authenticate("garbage").unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error, "Invalid or expired token");
    }
}
