// Common DTOs for the API
//
// These types are shared across multiple API endpoints.

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        Self::new(err.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse::from(&AuthError::conflict("taken"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "taken" })
        );
    }
}
