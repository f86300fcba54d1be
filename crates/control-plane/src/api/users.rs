// Users API routes
// Decision: Users manage only their own account through /users/me
// Decision: An email change reissues the session cookie, since the token carries the email

use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::patch,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use hiringhelper_core::{
    normalize_email, validate_email, validate_name, validate_password, UserEnvelope,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::cookie::remove_auth_cookie;
use crate::auth::middleware::{storage_error, AuthError, AuthState, AuthUser};
use crate::auth::routes::start_session;
use crate::storage::{password::hash_password, StorageBackend, UpdateUserRow};

/// App state for users routes
#[derive(Clone)]
pub struct UsersState {
    pub db: Arc<StorageBackend>,
    pub auth: AuthState,
}

impl FromRef<UsersState> for AuthState {
    fn from_ref(input: &UsersState) -> Self {
        input.auth.clone()
    }
}

/// Profile update; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Create users routes
pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/users/me", patch(update_me).delete(delete_me))
        .with_state(state)
}

impl UpdateProfileRequest {
    /// Validate the given fields and turn them into a storage update.
    /// The password is still plain text here; it is hashed by the caller.
    fn validate(self) -> Result<(UpdateUserRow, Option<String>), AuthError> {
        let name = self
            .name
            .map(|name| {
                let name = name.trim().to_string();
                validate_name(&name).map(|_| name)
            })
            .transpose()
            .map_err(|e| AuthError::bad_request(&e.to_string()))?;

        let email = self
            .email
            .map(|email| {
                let email = normalize_email(&email);
                validate_email(&email).map(|_| email)
            })
            .transpose()
            .map_err(|e| AuthError::bad_request(&e.to_string()))?;

        if let Some(password) = &self.password {
            validate_password(password).map_err(|e| AuthError::bad_request(&e.to_string()))?;
        }

        Ok((
            UpdateUserRow {
                email,
                name,
                password_hash: None,
            },
            self.password,
        ))
    }
}

/// PATCH /users/me - Update the signed-in user's profile
pub async fn update_me(
    State(state): State<UsersState>,
    auth: AuthUser,
    jar: CookieJar,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UserEnvelope>), AuthError> {
    let Json(req) = payload.map_err(|_| AuthError::bad_request("Invalid request body"))?;
    let (mut update, password) = req.validate()?;

    if update.is_empty() && password.is_none() {
        return Err(AuthError::bad_request(
            "At least one of name, email or password is required",
        ));
    }

    if let Some(password) = password {
        let hash = hash_password(&password).map_err(|e| {
            tracing::error!("Password hashing error: {:#}", e);
            AuthError::internal()
        })?;
        update.password_hash = Some(hash);
    }

    let user = state
        .db
        .update_user(&auth.id, update)
        .await
        .map_err(|e| storage_error("Failed to update user", e))?
        .ok_or_else(|| AuthError::not_found("User not found"))?;

    tracing::info!(user_id = %user.id, "Profile updated");

    if user.email != auth.email {
        return start_session(&state.auth, jar, &user);
    }
    Ok((jar, Json(user.to_public().into())))
}

/// DELETE /users/me - Delete the signed-in user's account and end the session
pub async fn delete_me(
    State(state): State<UsersState>,
    auth: AuthUser,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), AuthError> {
    let deleted = state
        .db
        .delete_user(&auth.id)
        .await
        .map_err(|e| storage_error("Failed to delete user", e))?;

    if !deleted {
        return Err(AuthError::not_found("User not found"));
    }

    tracing::info!(user_id = %auth.id, "Account deleted");
    Ok((
        StatusCode::NO_CONTENT,
        remove_auth_cookie(jar, &state.auth.config.cookie),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_deserialize() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name": "Jane"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Jane"));
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let (update, password) = UpdateProfileRequest {
            name: Some("  Jane Doe ".to_string()),
            email: Some(" Jane@Example.COM ".to_string()),
            password: Some("new-password".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(update.name.as_deref(), Some("Jane Doe"));
        assert_eq!(update.email.as_deref(), Some("jane@example.com"));
        assert!(update.password_hash.is_none());
        assert_eq!(password.as_deref(), Some("new-password"));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let err = UpdateProfileRequest {
            name: Some("J".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.error, "Name must be between 2 and 50 characters");

        let err = UpdateProfileRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.error, "Invalid email format");

        let err = UpdateProfileRequest {
            password: Some("short".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.error, "Password must be at least 8 characters long");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
