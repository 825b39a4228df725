//! Storage error types for the document storage abstraction layer.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested document was not found.
    #[error("Document not found: {doc_type}/{id}")]
    NotFound {
        /// The type of document that was not found.
        doc_type: String,
        /// The ID of the document that was not found.
        id: String,
    },

    /// A version conflict occurred during a conditional update.
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// The version the writer based its update on.
        expected: String,
        /// The version currently held by the store.
        actual: String,
    },

    /// Attempted to create a document that already exists.
    #[error("Document already exists: {doc_type}/{id}")]
    AlreadyExists {
        /// The type of document that already exists.
        doc_type: String,
        /// The ID of the document that already exists.
        id: String,
    },

    /// The document data is invalid.
    #[error("Invalid document: {message}")]
    InvalidDocument {
        /// Description of why the document is invalid.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            doc_type: doc_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `VersionConflict` error.
    #[must_use]
    pub fn version_conflict(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::VersionConflict {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            doc_type: doc_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidDocument` error.
    #[must_use]
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::VersionConflict { .. } | Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::InvalidDocument { .. } => ErrorCategory::Validation,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Document not found.
    NotFound,
    /// Conflict (version or existence).
    Conflict,
    /// Validation error.
    Validation,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("Queue", "123");
        assert_eq!(err.to_string(), "Document not found: Queue/123");

        let err = StorageError::version_conflict("1", "2");
        assert_eq!(err.to_string(), "Version conflict: expected 1, found 2");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("Queue", "123");
        assert!(err.is_not_found());
        assert!(!err.is_version_conflict());

        let err = StorageError::version_conflict("1", "2");
        assert!(err.is_version_conflict());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::version_conflict("1", "2").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::invalid_document("bad data").category(),
            ErrorCategory::Validation
        );
        assert_eq!(ErrorCategory::Conflict.to_string(), "conflict");
    }
}
