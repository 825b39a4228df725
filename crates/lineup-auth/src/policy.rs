//! Policy checks gating queue operations.
//!
//! Each check returns `Ok(())` or [`AuthError::Forbidden`] naming the
//! operation that was denied; callers propagate with `?`.

use crate::context::{AuthContext, Role};
use crate::error::AuthError;

/// Admin-only operations (queue creation).
pub fn ensure_admin(ctx: &AuthContext, operation: &str) -> Result<(), AuthError> {
    if ctx.role == Role::Admin {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "{operation} requires Admin role, caller is {}",
            ctx.role
        )))
    }
}

/// Staff/Admin operations (queue visibility, dequeue).
pub fn ensure_staff(ctx: &AuthContext, operation: &str) -> Result<(), AuthError> {
    if ctx.role.is_operational() {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "{operation} requires Staff or Admin role, caller is {}",
            ctx.role
        )))
    }
}

/// Self-service operations: the caller must be the patient in question.
pub fn ensure_self(
    ctx: &AuthContext,
    patient_ref: &str,
    operation: &str,
) -> Result<(), AuthError> {
    if ctx.is_self(patient_ref) {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "{operation} is restricted to the patient {patient_ref}"
        )))
    }
}

/// Operations visible to the involved patient or to Staff/Admin
/// (queue length, position lookups).
pub fn ensure_self_or_staff(
    ctx: &AuthContext,
    patient_ref: &str,
    operation: &str,
) -> Result<(), AuthError> {
    if ctx.role.is_operational() || ctx.is_self(patient_ref) {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "{operation} is restricted to {patient_ref} or Staff/Admin"
        )))
    }
}
