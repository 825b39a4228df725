//! Caller extraction from trusted gateway headers.
//!
//! The gateway in front of this service verifies tokens and forwards the
//! resolved identity as `x-lineup-role` and `x-lineup-identity`. Requests
//! without both headers are rejected with 401.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use serde_json::{Value, json};

use lineup_auth::{AuthContext, Role};

pub const ROLE_HEADER: &str = "x-lineup-role";
pub const IDENTITY_HEADER: &str = "x-lineup-identity";

/// The verified caller of a request.
pub struct Caller(pub AuthContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = header_value(parts, ROLE_HEADER)?;
        let identity = header_value(parts, IDENTITY_HEADER)?;

        let role: Role = role
            .parse()
            .map_err(|e: String| reject(StatusCode::UNAUTHORIZED, &e))?;
        if identity.is_empty() {
            return Err(reject(StatusCode::UNAUTHORIZED, "empty caller identity"));
        }
        Ok(Caller(AuthContext::new(role, identity)))
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<String, (StatusCode, Json<Value>)> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, &format!("missing {name} header")))
}

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}
