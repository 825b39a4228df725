//! Queue operations over a versioned document store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use lineup_auth::{AuthContext, policy};
use lineup_core::{QUEUE_DOC_TYPE, Queue, QueueEntry, generate_id, validate_id};
use lineup_storage::{DocumentStore, SearchParams, StoredDocument};

use crate::error::QueueError;

/// A queue together with the version token it was read or written at.
///
/// The version must be echoed back on the next conditional write; once a
/// write fails with [`QueueError::Contention`] the snapshot is stale and
/// must be discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub queue: Queue,
    pub version_id: String,
}

/// Implements the queue operations: create, read, join, leave, position,
/// length and dequeue.
///
/// Every mutation is one fetch → in-memory change → conditional write
/// cycle. There is no in-process locking and no retry on conflict; among N
/// concurrent writers against the same read version the store admits at
/// most one, and the rest fail fast with [`QueueError::Contention`].
pub struct QueueService {
    store: Arc<dyn DocumentStore>,
}

impl QueueService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a new empty queue. Admin only.
    pub async fn create_queue(&self, ctx: &AuthContext) -> Result<QueueSnapshot, QueueError> {
        policy::ensure_admin(ctx, "create queue")?;

        let queue = Queue::new(generate_id());
        let document = queue
            .to_document()
            .map_err(|e| QueueError::corrupt_document(e.to_string()))?;
        let stored = self
            .store
            .create(QUEUE_DOC_TYPE, &document)
            .await
            .map_err(QueueError::Storage)?;

        tracing::info!(queue_id = %stored.id, "queue created");
        Ok(QueueSnapshot {
            queue,
            version_id: stored.version_id,
        })
    }

    /// Finds the live queue, if one has been created yet. Staff/Admin only.
    pub async fn find_current_queue(
        &self,
        ctx: &AuthContext,
    ) -> Result<Option<QueueSnapshot>, QueueError> {
        policy::ensure_staff(ctx, "find current queue")?;

        let params = SearchParams::new()
            .with_param("status", "current")
            .with_count(1);
        let found = self
            .store
            .search(QUEUE_DOC_TYPE, &params)
            .await
            .map_err(QueueError::Storage)?;

        let Some(stored) = found.into_iter().next() else {
            return Ok(None);
        };
        let queue = Queue::from_document(&stored.document)
            .map_err(|e| QueueError::corrupt_document(e.to_string()))?;
        Ok(Some(QueueSnapshot {
            queue,
            version_id: stored.version_id,
        }))
    }

    /// Fetches a queue with its entries and version. Staff/Admin only.
    pub async fn get_queue(
        &self,
        ctx: &AuthContext,
        queue_id: &str,
    ) -> Result<QueueSnapshot, QueueError> {
        policy::ensure_staff(ctx, "get queue")?;
        let (queue, version_id) = self.fetch(queue_id).await?;
        Ok(QueueSnapshot { queue, version_id })
    }

    /// Number of waiting patients. Visible to Staff/Admin and to patients
    /// currently holding an entry in the queue.
    pub async fn queue_length(
        &self,
        ctx: &AuthContext,
        queue_id: &str,
    ) -> Result<usize, QueueError> {
        let (queue, _) = self.fetch(queue_id).await?;
        if !ctx.role.is_operational() && !queue.contains(&ctx.identity_id) {
            policy::ensure_staff(ctx, "queue length")?;
        }
        Ok(queue.len())
    }

    /// The patient's 1-based place in line, `None` when absent. Visible to
    /// the patient in question and to Staff/Admin.
    pub async fn patient_position(
        &self,
        ctx: &AuthContext,
        queue_id: &str,
        patient_ref: &str,
    ) -> Result<Option<usize>, QueueError> {
        policy::ensure_self_or_staff(ctx, patient_ref, "patient position")?;
        let (queue, _) = self.fetch(queue_id).await?;
        Ok(queue.index_of(patient_ref).map(|idx| idx + 1))
    }

    /// Joins the back of the line. Self-service only.
    ///
    /// Fails with [`QueueError::AlreadyInQueue`] on double submission and
    /// with [`QueueError::Contention`] when the conditional write loses a
    /// race; the caller retries from a fresh read.
    pub async fn join(
        &self,
        ctx: &AuthContext,
        queue_id: &str,
        patient_ref: &str,
    ) -> Result<QueueSnapshot, QueueError> {
        policy::ensure_self(ctx, patient_ref, "join queue")?;

        let (mut queue, version_id) = self.fetch(queue_id).await?;
        if queue.contains(patient_ref) {
            return Err(QueueError::already_in_queue(patient_ref));
        }
        queue.push_entry(patient_ref);

        let snapshot = self.conditional_write(queue, &version_id).await?;
        tracing::debug!(
            queue_id = %queue_id,
            patient_ref = %patient_ref,
            position = snapshot.queue.len(),
            "patient joined queue"
        );
        Ok(snapshot)
    }

    /// Leaves the line, preserving the relative order of everyone else.
    /// Self-service only.
    pub async fn leave(
        &self,
        ctx: &AuthContext,
        queue_id: &str,
        patient_ref: &str,
    ) -> Result<QueueSnapshot, QueueError> {
        policy::ensure_self(ctx, patient_ref, "leave queue")?;

        let (mut queue, version_id) = self.fetch(queue_id).await?;
        if !queue.remove_patient(patient_ref) {
            return Err(QueueError::not_in_queue(patient_ref));
        }

        let snapshot = self.conditional_write(queue, &version_id).await?;
        tracing::debug!(
            queue_id = %queue_id,
            patient_ref = %patient_ref,
            "patient left queue"
        );
        Ok(snapshot)
    }

    /// Removes and returns the longest-waiting patient for the front
    /// office. Staff/Admin only. Returns `Ok(None)` on an empty queue.
    pub async fn dequeue_head(
        &self,
        ctx: &AuthContext,
        queue_id: &str,
    ) -> Result<Option<(QueueEntry, QueueSnapshot)>, QueueError> {
        policy::ensure_staff(ctx, "dequeue head")?;

        let (mut queue, version_id) = self.fetch(queue_id).await?;
        let Some(head) = queue.pop_head() else {
            return Ok(None);
        };

        let snapshot = self.conditional_write(queue, &version_id).await?;
        tracing::info!(
            queue_id = %queue_id,
            patient_ref = %head.patient_ref,
            remaining = snapshot.queue.len(),
            "dequeued head of queue"
        );
        Ok(Some((head, snapshot)))
    }

    /// Spots still admittable right now, given the clinic's availability
    /// windows and the patients already waiting. Open to any verified
    /// caller: a patient deciding whether to walk in needs this number,
    /// and it only discloses aggregate capacity.
    pub async fn available_spot_count(
        &self,
        _ctx: &AuthContext,
        queue_id: &str,
        duration_secs: u32,
        weekday: time::Weekday,
        now: time::Time,
        windows: &[crate::AvailabilityWindow],
    ) -> Result<u32, QueueError> {
        let (queue, _) = self.fetch(queue_id).await?;
        Ok(crate::available_spots(
            duration_secs,
            weekday,
            now,
            windows,
            queue.len(),
        ))
    }

    /// Reads a queue document and its version token.
    async fn fetch(&self, queue_id: &str) -> Result<(Queue, String), QueueError> {
        validate_id(queue_id).map_err(|e| QueueError::InvalidId(e.to_string()))?;

        let stored: StoredDocument = self
            .store
            .read(QUEUE_DOC_TYPE, queue_id)
            .await
            .map_err(QueueError::Storage)?
            .ok_or_else(|| QueueError::not_found(queue_id))?;

        let queue = Queue::from_document(&stored.document)
            .map_err(|e| QueueError::corrupt_document(e.to_string()))?;
        Ok((queue, stored.version_id))
    }

    /// Writes a mutated queue back, conditional on the version captured at
    /// fetch time. A version conflict becomes [`QueueError::Contention`].
    async fn conditional_write(
        &self,
        queue: Queue,
        version_id: &str,
    ) -> Result<QueueSnapshot, QueueError> {
        let document = queue
            .to_document()
            .map_err(|e| QueueError::corrupt_document(e.to_string()))?;

        match self
            .store
            .update(QUEUE_DOC_TYPE, &queue.id, &document, Some(version_id))
            .await
        {
            Ok(stored) => Ok(QueueSnapshot {
                queue,
                version_id: stored.version_id,
            }),
            Err(e) if e.is_version_conflict() => {
                tracing::warn!(queue_id = %queue.id, "conditional write lost a race");
                Err(QueueError::contention(&queue.id))
            }
            Err(e) => Err(QueueError::Storage(e)),
        }
    }
}
