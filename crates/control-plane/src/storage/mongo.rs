// MongoDB storage implementation
// Decision: One unique index on email; duplicate inserts are detected via the
// server error code rather than a read-before-write
// Decision: The email index and lookups use a case-insensitive collation, so
// accounts stored with mixed-case addresses still match normalized input

use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use mongodb::{
    options::{Collation, CollationStrength, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};

use super::error::Result;
use super::models::{CreateUserRow, UpdateUserRow, UserDocument, USERS_COLLECTION};

/// Name of the collated unique index on `users.email`
pub const EMAIL_INDEX_NAME: &str = "email_ci_unique";

/// Case-insensitive comparison (strength 2 ignores case, not diacritics)
fn email_collation() -> Collation {
    Collation::builder()
        .locale("en".to_string())
        .strength(CollationStrength::Secondary)
        .build()
}

/// MongoDB-backed user store
#[derive(Clone)]
pub struct MongoDatabase {
    client: Client,
    db: Database,
}

impl MongoDatabase {
    /// Connect, verify the server is reachable and ensure indexes exist.
    ///
    /// The database named in the URI takes precedence over `default_database`.
    pub async fn connect(uri: &str, default_database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(default_database));

        let store = Self { client, db };
        store.ping().await?;
        store.init_indexes().await?;

        tracing::info!(database = %store.db.name(), "MongoDB connected successfully");
        Ok(store)
    }

    fn users(&self) -> Collection<UserDocument> {
        self.db.collection(USERS_COLLECTION)
    }

    pub async fn init_indexes(&self) -> Result<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name(EMAIL_INDEX_NAME.to_string())
                    .unique(true)
                    .collation(email_collation())
                    .build(),
            )
            .build();

        // Existing data with case-only duplicates cannot take the index; the
        // server still runs, with uniqueness checked by the register handler
        if let Err(e) = self.users().create_index(email_index).await {
            tracing::warn!(
                index = EMAIL_INDEX_NAME,
                "Could not create case-insensitive email index: {}",
                e
            );
            return Ok(());
        }

        tracing::debug!("User indexes ensured");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB disconnected");
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserDocument> {
        let now = Utc::now();
        let user = UserDocument {
            id: ObjectId::new(),
            email: input.email,
            password_hash: input.password_hash,
            name: input.name,
            created_at: now,
            updated_at: now,
        };

        self.users().insert_one(&user).await?;
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDocument>> {
        let user = self
            .users()
            .find_one(doc! { "email": email })
            .collation(email_collation())
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<Option<UserDocument>> {
        let user = self.users().find_one(doc! { "_id": *id }).await?;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: &ObjectId,
        input: UpdateUserRow,
    ) -> Result<Option<UserDocument>> {
        let user = self
            .users()
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": update_fields(input) })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    pub async fn delete_user(&self, id: &ObjectId) -> Result<bool> {
        let result = self.users().delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count == 1)
    }

    pub async fn count_users(&self) -> Result<u64> {
        let count = self.users().count_documents(doc! {}).await?;
        Ok(count)
    }
}

/// Build the `$set` document for a partial update. `updatedAt` is always set.
fn update_fields(input: UpdateUserRow) -> Document {
    let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(Utc::now()) };
    if let Some(email) = input.email {
        set.insert("email", email);
    }
    if let Some(name) = input.name {
        set.insert("name", name);
    }
    if let Some(password_hash) = input.password_hash {
        set.insert("password", password_hash);
    }
    set
}
