// HiringHelper core
//
// Shared, storage-agnostic building blocks:
// - validation: rules for user-supplied email, password and name
// - user: the public user view returned by every auth endpoint
// - telemetry: tracing subscriber setup used by the server binary

pub mod telemetry;
pub mod user;
pub mod validation;

pub use user::{PublicUser, UserEnvelope};
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password, ValidationError,
};
