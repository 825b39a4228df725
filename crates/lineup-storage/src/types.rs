//! Data types used by the storage traits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use time::OffsetDateTime;

/// A document as stored in the storage backend.
///
/// `version_id` is the opaque compare-and-swap token: it changes on every
/// successful write and must be echoed back on conditional updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// The document ID.
    pub id: String,
    /// The version ID of this specific version.
    pub version_id: String,
    /// The document type (e.g., "Queue").
    pub doc_type: String,
    /// The full document content as JSON.
    pub document: Value,
    /// When this version was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    /// When the document was originally created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl StoredDocument {
    /// Creates a new `StoredDocument`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        version_id: impl Into<String>,
        doc_type: impl Into<String>,
        document: Value,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            version_id: version_id.into(),
            doc_type: doc_type.into(),
            document,
            last_updated: now,
            created_at: now,
        }
    }

    /// Creates a new version of this document with updated content.
    #[must_use]
    pub fn new_version(&self, version_id: impl Into<String>, document: Value) -> Self {
        Self {
            id: self.id.clone(),
            version_id: version_id.into(),
            doc_type: self.doc_type.clone(),
            document,
            last_updated: OffsetDateTime::now_utc(),
            created_at: self.created_at,
        }
    }
}

/// Parameters for a search query.
///
/// Multiple values for the same key represent OR conditions; a document
/// matches a parameter when the named top-level field equals one of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search parameters as key-value pairs.
    pub parameters: HashMap<String, Vec<String>>,
    /// Maximum number of results to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl SearchParams {
    /// Creates new empty `SearchParams`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a search parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Sets the count parameter.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Returns true if this search has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_document_serialization() {
        let doc = StoredDocument::new(
            "123",
            "1",
            "Queue",
            serde_json::json!({"id": "123", "title": "Patient Queue"}),
        );

        let json = serde_json::to_string(&doc).expect("serialization failed");
        let deserialized: StoredDocument =
            serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(doc.id, deserialized.id);
        assert_eq!(doc.version_id, deserialized.version_id);
        assert_eq!(doc.doc_type, deserialized.doc_type);
    }

    #[test]
    fn test_new_version_keeps_identity() {
        let doc = StoredDocument::new("123", "1", "Queue", serde_json::json!({}));
        let next = doc.new_version("2", serde_json::json!({"title": "x"}));
        assert_eq!(next.id, "123");
        assert_eq!(next.version_id, "2");
        assert_eq!(next.created_at, doc.created_at);
    }

    #[test]
    fn test_search_params_builder() {
        let params = SearchParams::new()
            .with_param("status", "current")
            .with_param("status", "draft")
            .with_count(10);

        assert_eq!(params.parameters.get("status").unwrap().len(), 2);
        assert_eq!(params.count, Some(10));
        assert!(!params.is_empty());
    }
}
