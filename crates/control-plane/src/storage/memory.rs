// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: Email uniqueness is checked under the same write lock as the insert,
// mirroring the unique index on the MongoDB collection
// Decision: Emails compare case-insensitively, like the collated index

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::error::{Result, StorageError};
use super::models::{CreateUserRow, UpdateUserRow, UserDocument};

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<ObjectId, UserDocument>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserDocument> {
        let mut users = self.users.write();
        if users.values().any(|u| same_email(&u.email, &input.email)) {
            return Err(StorageError::DuplicateEmail);
        }

        let now = Self::now();
        let user = UserDocument {
            id: ObjectId::new(),
            email: input.email,
            password_hash: input.password_hash,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDocument>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| same_email(&u.email, email))
            .cloned())
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<Option<UserDocument>> {
        Ok(self.users.read().get(id).cloned())
    }

    pub async fn update_user(
        &self,
        id: &ObjectId,
        input: UpdateUserRow,
    ) -> Result<Option<UserDocument>> {
        let mut users = self.users.write();

        if let Some(email) = &input.email {
            if users.values().any(|u| &u.id != id && same_email(&u.email, email)) {
                return Err(StorageError::DuplicateEmail);
            }
        }

        if let Some(user) = users.get_mut(id) {
            if let Some(email) = input.email {
                user.email = email;
            }
            if let Some(name) = input.name {
                user.name = name;
            }
            if let Some(password_hash) = input.password_hash {
                user.password_hash = password_hash;
            }
            user.updated_at = Self::now();
            return Ok(Some(user.clone()));
        }
        Ok(None)
    }

    pub async fn delete_user(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.users.write().remove(id).is_some())
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(self.users.read().len() as u64)
    }
}

/// Stored addresses may predate normalization ("Jane@Example.com")
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> CreateUserRow {
        CreateUserRow {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(new_user("a@example.com")).await.unwrap();

        assert_eq!(user.created_at, user.updated_at);

        let by_id = db.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let by_email = db.get_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(db.get_user_by_email("b@example.com").await.unwrap().is_none());
        assert!(db.get_user(&ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = InMemoryDatabase::new();
        db.create_user(new_user("a@example.com")).await.unwrap();

        let result = db.create_user(new_user("a@example.com")).await;
        assert!(matches!(result, Err(StorageError::DuplicateEmail)));
        assert_eq!(db.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_user() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(new_user("a@example.com")).await.unwrap();

        let updated = db
            .update_user(
                &user.id,
                UpdateUserRow {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "a@example.com");
        assert_eq!(updated.password_hash, "hash");
        assert!(updated.updated_at >= user.updated_at);
        assert_eq!(updated.created_at, user.created_at);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        let db = InMemoryDatabase::new();
        db.create_user(new_user("a@example.com")).await.unwrap();
        let b = db.create_user(new_user("b@example.com")).await.unwrap();

        let result = db
            .update_user(
                &b.id,
                UpdateUserRow {
                    email: Some("a@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StorageError::DuplicateEmail)));

        // Keeping one's own email is not a conflict
        let same = db
            .update_user(
                &b.id,
                UpdateUserRow {
                    email: Some("b@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(same.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let db = InMemoryDatabase::new();
        let result = db
            .update_user(&ObjectId::new(), UpdateUserRow::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(new_user("a@example.com")).await.unwrap();

        assert!(db.delete_user(&user.id).await.unwrap());
        assert!(!db.delete_user(&user.id).await.unwrap());
        assert_eq!(db.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_legacy_mixed_case_email() {
        let db = InMemoryDatabase::new();
        let legacy = db.create_user(new_user("Jane@Example.com")).await.unwrap();

        let found = db.get_user_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, legacy.id);
        assert_eq!(found.email, "Jane@Example.com");

        let result = db.create_user(new_user("jane@example.com")).await;
        assert!(matches!(result, Err(StorageError::DuplicateEmail)));

        let other = db.create_user(new_user("other@example.com")).await.unwrap();
        let result = db
            .update_user(
                &other.id,
                UpdateUserRow {
                    email: Some("JANE@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StorageError::DuplicateEmail)));
    }
}
