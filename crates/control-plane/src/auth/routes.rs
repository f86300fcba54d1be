// Authentication HTTP routes
// Decision: Mounted under the API prefix as /auth/* (the prefix is applied by the app router)
// Decision: The token travels only in the HTTP-only cookie; bodies carry `{ user }`

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use hiringhelper_core::{
    normalize_email, validate_email, validate_name, validate_password, UserEnvelope,
};
use serde::{Deserialize, Serialize};

use super::{
    cookie::{remove_auth_cookie, set_auth_cookie},
    middleware::{storage_error, token_from_headers, AuthError, AuthState},
};
use crate::storage::{
    models::{CreateUserRow, UserDocument},
    password::{burn_password_check, hash_password, verify_password},
};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// `{ "message": "..." }` response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/verify", get(verify))
        .with_state(state)
}

/// Unwrap a JSON body, mapping any rejection to a 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AuthError::bad_request("Invalid request body")
    })
}

impl RegisterRequest {
    fn has_required_fields(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty() && !self.name.trim().is_empty()
    }
}

impl LoginRequest {
    fn has_required_fields(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

/// POST /auth/register - Create an account and start a session
pub async fn register(
    State(state): State<AuthState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<UserEnvelope>), AuthError> {
    let req = json_body(payload)?;
    if !req.has_required_fields() {
        return Err(AuthError::bad_request(
            "Email, password and name are required",
        ));
    }

    let email = normalize_email(&req.email);
    let name = req.name.trim().to_string();
    validate_email(&email)
        .and_then(|_| validate_password(&req.password))
        .and_then(|_| validate_name(&name))
        .map_err(|e| AuthError::bad_request(&e.to_string()))?;

    let existing = state
        .db
        .get_user_by_email(&email)
        .await
        .map_err(|e| storage_error("Database error during registration", e))?;
    if existing.is_some() {
        return Err(AuthError::conflict("User with this email already exists"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing error: {:#}", e);
        AuthError::internal()
    })?;

    // The unique index still catches a concurrent registration of the same email
    let user = state
        .db
        .create_user(CreateUserRow {
            email,
            name,
            password_hash,
        })
        .await
        .map_err(|e| storage_error("User creation error", e))?;

    tracing::info!(user_id = %user.id, "User registered");

    let (jar, body) = start_session(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// POST /auth/login - Login with email and password
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UserEnvelope>), AuthError> {
    let req = json_body(payload)?;
    if !req.has_required_fields() {
        return Err(AuthError::bad_request("Email and password are required"));
    }

    let email = normalize_email(&req.email);
    validate_email(&email).map_err(|e| AuthError::bad_request(&e.to_string()))?;

    // Unknown email and wrong password share one message and one hash cost
    let Some(user) = state
        .db
        .get_user_by_email(&email)
        .await
        .map_err(|e| storage_error("Database error during login", e))?
    else {
        burn_password_check(&req.password);
        tracing::debug!("Login attempt for unknown email");
        return Err(AuthError::unauthorized("Invalid email or password"));
    };

    let valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
        tracing::error!(user_id = %user.id, "Password verification error: {:#}", e);
        AuthError::internal()
    })?;

    if !valid {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AuthError::unauthorized("Invalid email or password"));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    start_session(&state, jar, &user)
}

/// POST /auth/logout - Clear the session cookie
pub async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    tracing::debug!("Session cookie cleared");
    (
        remove_auth_cookie(jar, &state.config.cookie),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// GET /auth/verify - Return the user behind the current session
pub async fn verify(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<UserEnvelope>, AuthError> {
    let token = token_from_headers(&headers, &state.config)
        .ok_or_else(|| AuthError::unauthorized("No authentication token found"))?;

    let user = state
        .load_session_user(&token)
        .await?
        .ok_or_else(|| AuthError::unauthorized("User not found"))?;

    Ok(Json(user.to_public().into()))
}

/// Issue a token for `user`, put it in the session cookie and build the response body
pub(crate) fn start_session(
    state: &AuthState,
    jar: CookieJar,
    user: &UserDocument,
) -> Result<(CookieJar, Json<UserEnvelope>), AuthError> {
    let token = state.jwt_service.issue(&user.id, &user.email).map_err(|e| {
        tracing::error!("Token generation error: {:#}", e);
        AuthError::internal()
    })?;

    let jar = set_auth_cookie(
        jar,
        &state.config.cookie,
        token,
        state.jwt_service.token_lifetime_secs(),
    );
    Ok((jar, Json(user.to_public().into())))
}
