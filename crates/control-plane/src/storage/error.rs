// Storage error type
// Decision: Duplicate emails surface as a dedicated variant so handlers can map
// them to 409 without inspecting driver errors

/// MongoDB server error code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A user with the same email already exists
    #[error("email already exists")]
    DuplicateEmail,

    /// Database error
    #[error("database error: {0}")]
    Database(mongodb::error::Error),
}

impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            Self::DuplicateEmail
        } else {
            Self::Database(err)
        }
    }
}

/// Check whether a driver error is a unique index violation.
/// Inserts report it as a write error, findAndModify as a command error.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
