use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use lineup_core::{generate_id, validate_id};
use lineup_storage::{DocumentStore, SearchParams, StorageError, StoredDocument};

pub type StorageKey = String; // Format: "DocType/id"

pub(crate) fn make_storage_key(doc_type: &str, id: &str) -> StorageKey {
    format!("{doc_type}/{id}")
}

/// In-memory document store.
///
/// The map guard is held across the version check and the insert of a
/// conditional update, which is what makes the compare-and-swap atomic:
/// contending writers based on the same read version all fail except one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Main storage; the write guard is the only serialization point.
    data: RwLock<HashMap<StorageKey, StoredDocument>>,
    /// Atomic counter for generating version IDs.
    version_counter: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            version_counter: AtomicU64::new(1),
        }
    }

    /// Generates the next version ID.
    fn next_version(&self) -> String {
        self.version_counter
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
    }

    /// Number of documents currently held, across all types.
    pub async fn count(&self) -> usize {
        self.data.read().await.len()
    }
}

fn extract_id(document: &Value) -> Option<String> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Matches a single search parameter against a top-level document field.
fn field_matches(document: &Value, key: &str, wanted: &[String]) -> bool {
    let Some(field) = document.get(key) else {
        return false;
    };
    let actual = match field {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    wanted.iter().any(|w| *w == actual)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create(
        &self,
        doc_type: &str,
        document: &Value,
    ) -> Result<StoredDocument, StorageError> {
        if !document.is_object() {
            return Err(StorageError::invalid_document(
                "document body must be a JSON object",
            ));
        }

        let id = match extract_id(document) {
            Some(id) => {
                validate_id(&id).map_err(|e| StorageError::invalid_document(e.to_string()))?;
                id
            }
            None => generate_id(),
        };

        let mut body = document.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.clone()));
        }

        let key = make_storage_key(doc_type, &id);
        let version_id = self.next_version();
        let stored = StoredDocument::new(id.clone(), version_id, doc_type, body);

        let mut guard = self.data.write().await;
        if guard.contains_key(&key) {
            return Err(StorageError::already_exists(doc_type, id));
        }
        guard.insert(key, stored.clone());
        Ok(stored)
    }

    async fn read(
        &self,
        doc_type: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StorageError> {
        let key = make_storage_key(doc_type, id);
        let guard = self.data.read().await;
        Ok(guard.get(&key).cloned())
    }

    async fn update(
        &self,
        doc_type: &str,
        id: &str,
        document: &Value,
        if_match: Option<&str>,
    ) -> Result<StoredDocument, StorageError> {
        if !document.is_object() {
            return Err(StorageError::invalid_document(
                "document body must be a JSON object",
            ));
        }

        let mut body = document.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.to_string()));
        }

        let key = make_storage_key(doc_type, id);
        let version_id = self.next_version();

        // Version check and insert happen under one write guard; this is
        // the compare-and-swap the queue operations rely on.
        let mut guard = self.data.write().await;
        let existing = guard
            .get(&key)
            .ok_or_else(|| StorageError::not_found(doc_type, id))?;

        if let Some(expected_version) = if_match {
            if existing.version_id != expected_version {
                return Err(StorageError::version_conflict(
                    expected_version,
                    existing.version_id.clone(),
                ));
            }
        }

        let stored = existing.new_version(version_id, body);
        guard.insert(key, stored.clone());
        Ok(stored)
    }

    async fn search(
        &self,
        doc_type: &str,
        params: &SearchParams,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        let prefix = format!("{doc_type}/");
        let guard = self.data.read().await;

        let mut matching: Vec<StoredDocument> = guard
            .iter()
            .filter(|(key, stored)| {
                key.starts_with(&prefix)
                    && params
                        .parameters
                        .iter()
                        .all(|(k, wanted)| field_matches(&stored.document, k, wanted))
            })
            .map(|(_, stored)| stored.clone())
            .collect();

        matching.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(count) = params.count {
            matching.truncate(count as usize);
        }
        Ok(matching)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
