//! # Table Authorization
//!
//! Enforces per-table and per-column access policy before any condition is
//! compiled or any store call is made.

mod errors;
mod gate;

pub use errors::{AuthError, AuthResult};
pub use gate::{Allowlist, AuthorizationGate};
