//! Caller identity and authorization policy.
//!
//! Token verification happens upstream; this crate only models the already
//! verified caller (role + identity) and the policy checks the queue
//! operations gate on.

pub mod context;
pub mod error;
pub mod policy;

pub use context::{AuthContext, Role};
pub use error::AuthError;
