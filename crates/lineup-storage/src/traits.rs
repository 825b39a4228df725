//! Storage traits for the document storage abstraction layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;
use crate::types::{SearchParams, StoredDocument};

/// The main storage trait that all document store backends implement.
///
/// This trait defines the contract the queue service needs: CRUD with
/// version tokens and a conditional (compare-and-swap) update. The real
/// deployment backs this with a FHIR store whose ETags serve as version
/// ids; any KV/document store with compare-and-swap semantics satisfies
/// the contract. Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use lineup_storage::{DocumentStore, StorageError, StoredDocument};
///
/// async fn get_queue(store: &dyn DocumentStore, id: &str) -> Result<StoredDocument, StorageError> {
///     store
///         .read("Queue", id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("Queue", id))
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a new document in the storage.
    ///
    /// The document may contain an `id` field; if none is provided, the
    /// backend generates one. The returned envelope carries the fresh
    /// version id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if a document with the same
    /// type and ID exists.
    /// Returns `StorageError::InvalidDocument` if the document is malformed.
    async fn create(&self, doc_type: &str, document: &Value)
    -> Result<StoredDocument, StorageError>;

    /// Reads a document by type and ID.
    ///
    /// Returns `None` if the document does not exist. The returned envelope
    /// carries the version id required for a subsequent conditional update.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing
    /// documents.
    async fn read(&self, doc_type: &str, id: &str)
    -> Result<Option<StoredDocument>, StorageError>;

    /// Updates an existing document.
    ///
    /// If `if_match` is provided, the update only succeeds when the store's
    /// current version equals the provided version id; this is the
    /// compare-and-swap primitive the queue operations rely on. Among N
    /// concurrent conditional updates based on the same read version, at
    /// most one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    /// Returns `StorageError::VersionConflict` if `if_match` is provided
    /// and doesn't match.
    /// Returns `StorageError::InvalidDocument` if the document is malformed.
    async fn update(
        &self,
        doc_type: &str,
        id: &str,
        document: &Value,
        if_match: Option<&str>,
    ) -> Result<StoredDocument, StorageError>;

    /// Searches for documents of a given type.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn search(
        &self,
        doc_type: &str,
        params: &SearchParams,
    ) -> Result<Vec<StoredDocument>, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that DocumentStore is object-safe
    fn _assert_store_object_safe(_: &dyn DocumentStore) {}
}
