// Authentication module
// Decision: Stateless sessions; a signed token in an HTTP-only cookie is the whole session

pub mod config;
pub mod cookie;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use guard::{require_session, PageGuard};
pub use middleware::{AuthError, AuthState, AuthUser};
pub use routes::routes;
