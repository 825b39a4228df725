//! The walk-in queue aggregate.
//!
//! A [`Queue`] is one physical waiting line: an ordered sequence of
//! [`QueueEntry`] values where insertion order is the queue order. The
//! concurrency version token never lives inside the document itself; it
//! travels alongside as the store's version id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Document type under which queues are stored.
pub const QUEUE_DOC_TYPE: &str = "Queue";

/// Display label given to newly created queues.
pub const DEFAULT_QUEUE_TITLE: &str = "Patient Queue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    /// The one live queue in operation.
    #[default]
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    /// A live queue that accepts mutations, as opposed to a snapshot.
    #[default]
    Working,
}

/// One patient's membership record within a queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Reference to exactly one patient identity, e.g. `Patient/123`.
    #[serde(rename = "patientRef")]
    pub patient_ref: String,
}

impl QueueEntry {
    pub fn new(patient_ref: impl Into<String>) -> Self {
        Self {
            patient_ref: patient_ref.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: String,
    pub status: QueueStatus,
    pub mode: QueueMode,
    pub title: String,
    /// Ordered waiting list; the head is the longest-waiting patient.
    /// A document with no entries field at all is an empty queue.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<QueueEntry>,
}

impl Queue {
    pub fn new(id: String) -> Self {
        Self {
            id,
            status: QueueStatus::Current,
            mode: QueueMode::Working,
            title: DEFAULT_QUEUE_TITLE.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, patient_ref: &str) -> bool {
        self.entries.iter().any(|e| e.patient_ref == patient_ref)
    }

    /// Zero-based index of a patient within the line, `None` when absent.
    pub fn index_of(&self, patient_ref: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.patient_ref == patient_ref)
    }

    /// Appends a new entry at the back of the line.
    pub fn push_entry(&mut self, patient_ref: impl Into<String>) {
        self.entries.push(QueueEntry::new(patient_ref));
    }

    /// Removes the first entry matching `patient_ref`, preserving the
    /// relative order of all remaining entries. Returns whether a matching
    /// entry was found.
    pub fn remove_patient(&mut self, patient_ref: &str) -> bool {
        match self.index_of(patient_ref) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the head of the line.
    pub fn pop_head(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Parses a queue out of a stored document body.
    pub fn from_document(document: &Value) -> Result<Self> {
        serde_json::from_value(document.clone()).map_err(|e| {
            CoreError::invalid_document(format!("not a valid Queue document: {e}"))
        })
    }

    /// Serializes the queue into a store document body.
    pub fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_entries_field_is_empty_queue() {
        let doc = json!({
            "id": "q1",
            "status": "current",
            "mode": "working",
            "title": "Patient Queue",
        });
        let queue = Queue::from_document(&doc).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_order_is_insertion_order() {
        let mut queue = Queue::new("q1".into());
        queue.push_entry("Patient/a");
        queue.push_entry("Patient/b");
        queue.push_entry("Patient/c");
        assert_eq!(queue.index_of("Patient/a"), Some(0));
        assert_eq!(queue.index_of("Patient/c"), Some(2));
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut queue = Queue::new("q1".into());
        for p in ["Patient/a", "Patient/b", "Patient/c", "Patient/d"] {
            queue.push_entry(p);
        }
        assert!(queue.remove_patient("Patient/b"));
        let refs: Vec<&str> = queue.entries.iter().map(|e| e.patient_ref.as_str()).collect();
        assert_eq!(refs, ["Patient/a", "Patient/c", "Patient/d"]);
    }

    #[test]
    fn test_remove_absent_patient_is_noop() {
        let mut queue = Queue::new("q1".into());
        queue.push_entry("Patient/a");
        assert!(!queue.remove_patient("Patient/z"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pop_head_fifo() {
        let mut queue = Queue::new("q1".into());
        queue.push_entry("Patient/a");
        queue.push_entry("Patient/b");
        let head = queue.pop_head().unwrap();
        assert_eq!(head.patient_ref, "Patient/a");
        assert_eq!(queue.index_of("Patient/b"), Some(0));
        queue.pop_head();
        assert!(queue.pop_head().is_none());
    }

    #[test]
    fn test_document_round_trip() {
        let mut queue = Queue::new("q1".into());
        queue.push_entry("Patient/a");
        let doc = queue.to_document().unwrap();
        assert_eq!(doc["status"], "current");
        assert_eq!(doc["mode"], "working");
        assert_eq!(doc["entries"][0]["patientRef"], "Patient/a");
        assert_eq!(Queue::from_document(&doc).unwrap(), queue);
    }
}
