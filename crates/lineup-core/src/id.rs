use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("ID must be 1-64 characters of [A-Za-z0-9.-]: {0}")]
    Invalid(String),
}

/// Generates a new opaque document id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validates an id supplied by a caller before it reaches the store.
pub fn validate_id(id: &str) -> Result<(), IdError> {
    let ok = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if ok {
        Ok(())
    } else {
        Err(IdError::Invalid(id.to_string()))
    }
}
