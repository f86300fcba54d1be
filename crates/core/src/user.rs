// Public user view
//
// The only user shape serialized to clients. Storage documents carry the
// password hash and timestamps; those never leave the server.

use serde::{Deserialize, Serialize};

/// User as returned by the auth and profile endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// Hex-encoded document id
    pub id: String,
    pub email: String,
    pub name: String,
}

/// `{ "user": { ... } }` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: PublicUser,
}

impl From<PublicUser> for UserEnvelope {
    fn from(user: PublicUser) -> Self {
        Self { user }
    }
}
