// Database models (document types)
// Decision: Field names match the documents written by the previous Node service
// (password, createdAt, updatedAt) so existing collections stay readable

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use hiringhelper_core::PublicUser;
use serde::{Deserialize, Serialize};

/// Name of the MongoDB collection holding users
pub const USERS_COLLECTION: &str = "users";

/// User document as stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    /// Salted password hash (PHC string or legacy bcrypt)
    #[serde(rename = "password")]
    pub password_hash: String,
    pub name: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl UserDocument {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.to_hex(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Input for creating a user. Email must already be normalized and the
/// password already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRow {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUserRow {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserDocument {
        let now = Utc::now();
        UserDocument {
            id: ObjectId::new(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            name: "Jane".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_document_field_names() {
        let doc = bson::to_document(&sample()).unwrap();
        assert!(doc.get_object_id("_id").is_ok());
        assert!(doc.get_str("password").is_ok());
        assert!(doc.get_datetime("createdAt").is_ok());
        assert!(doc.get_datetime("updatedAt").is_ok());
        assert!(!doc.contains_key("password_hash"));
    }

    #[test]
    fn test_to_public_hides_password() {
        let user = sample();
        let public = user.to_public();
        assert_eq!(public.id, user.id.to_hex());
        assert_eq!(public.email, "jane@example.com");
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_update_row_is_empty() {
        assert!(UpdateUserRow::default().is_empty());
        assert!(!UpdateUserRow {
            name: Some("Jane".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
