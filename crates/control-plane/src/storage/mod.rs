// Storage layer for the HiringHelper control-plane
// Decision: Support both MongoDB (production) and in-memory (dev mode)

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod password;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use mongo::MongoDatabase;
