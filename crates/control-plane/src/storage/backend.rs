// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either MongoDB (production) or in-memory (dev mode) storage.

use bson::oid::ObjectId;
use std::sync::Arc;

use super::error::Result;
use super::memory::InMemoryDatabase;
use super::models::*;
use super::mongo::MongoDatabase;

/// Storage backend that can be either MongoDB or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// MongoDB database (production)
    Mongo(MongoDatabase),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a MongoDB storage backend from a connection string
    pub async fn mongodb(uri: &str, default_database: &str) -> Result<Self> {
        let db = MongoDatabase::connect(uri, default_database).await?;
        Ok(Self::Mongo(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Short backend name for health output and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mongo(_) => "mongodb",
            Self::InMemory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            Self::Mongo(db) => db.ping().await,
            Self::InMemory(_) => Ok(()),
        }
    }

    /// Close connections; a no-op for the in-memory backend
    pub async fn shutdown(self) {
        if let Self::Mongo(db) = self {
            db.shutdown().await;
        }
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserDocument> {
        match self {
            Self::Mongo(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDocument>> {
        match self {
            Self::Mongo(db) => db.get_user_by_email(email).await,
            Self::InMemory(db) => db.get_user_by_email(email).await,
        }
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<Option<UserDocument>> {
        match self {
            Self::Mongo(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    pub async fn update_user(
        &self,
        id: &ObjectId,
        input: UpdateUserRow,
    ) -> Result<Option<UserDocument>> {
        match self {
            Self::Mongo(db) => db.update_user(id, input).await,
            Self::InMemory(db) => db.update_user(id, input).await,
        }
    }

    pub async fn delete_user(&self, id: &ObjectId) -> Result<bool> {
        match self {
            Self::Mongo(db) => db.delete_user(id).await,
            Self::InMemory(db) => db.delete_user(id).await,
        }
    }

    pub async fn count_users(&self) -> Result<u64> {
        match self {
            Self::Mongo(db) => db.count_users().await,
            Self::InMemory(db) => db.count_users().await,
        }
    }
}
