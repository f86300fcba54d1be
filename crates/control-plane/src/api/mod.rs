// HTTP API routes
//
// Protected resources served under the API prefix. Each submodule owns its
// routes and state; the auth routes live in crate::auth.

pub mod common;
pub mod dashboard;
pub mod health;
pub mod users;

// Re-export common types
pub use common::ErrorResponse;
