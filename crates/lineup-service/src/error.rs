//! Error taxonomy for queue operations.

use lineup_auth::AuthError;
use lineup_storage::StorageError;

/// Errors surfaced by [`crate::QueueService`] operations.
///
/// `Contention` is deliberately retryable-by-caller: under a burst of
/// simultaneous writes, failing the losers fast is the admission-control
/// mechanism, so the service never converts it into an internal retry.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The referenced queue does not exist in the store.
    #[error("Queue not found: {queue_id}")]
    NotFound {
        /// The queue id that did not resolve.
        queue_id: String,
    },

    /// The queue id is malformed and never reached the store.
    #[error("Invalid queue id: {0}")]
    InvalidId(String),

    /// Join attempted for a patient already present.
    #[error("Patient already in queue: {patient_ref}")]
    AlreadyInQueue {
        /// The patient already holding an entry.
        patient_ref: String,
    },

    /// Leave attempted for a patient not present.
    #[error("Patient not in queue: {patient_ref}")]
    NotInQueue {
        /// The patient without an entry.
        patient_ref: String,
    },

    /// The conditional write lost a race to a concurrent writer.
    #[error("Queue {queue_id} was modified concurrently; retry from a fresh read")]
    Contention {
        /// The contended queue id.
        queue_id: String,
    },

    /// The caller lacks permission for the operation/target.
    #[error(transparent)]
    Forbidden(#[from] AuthError),

    /// The stored document could not be parsed as a queue.
    #[error("Corrupt queue document: {message}")]
    CorruptDocument {
        /// Description of the parse failure.
        message: String,
    },

    /// Underlying store failure, propagated opaquely.
    ///
    /// Write paths map `VersionConflict` to [`Self::Contention`] before
    /// wrapping, so a conflict never hides in here.
    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl QueueError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(queue_id: impl Into<String>) -> Self {
        Self::NotFound {
            queue_id: queue_id.into(),
        }
    }

    /// Creates a new `AlreadyInQueue` error.
    #[must_use]
    pub fn already_in_queue(patient_ref: impl Into<String>) -> Self {
        Self::AlreadyInQueue {
            patient_ref: patient_ref.into(),
        }
    }

    /// Creates a new `NotInQueue` error.
    #[must_use]
    pub fn not_in_queue(patient_ref: impl Into<String>) -> Self {
        Self::NotInQueue {
            patient_ref: patient_ref.into(),
        }
    }

    /// Creates a new `Contention` error.
    #[must_use]
    pub fn contention(queue_id: impl Into<String>) -> Self {
        Self::Contention {
            queue_id: queue_id.into(),
        }
    }

    /// Creates a new `CorruptDocument` error.
    #[must_use]
    pub fn corrupt_document(message: impl Into<String>) -> Self {
        Self::CorruptDocument {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a contention error the caller may retry.
    #[must_use]
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::Contention { .. })
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
