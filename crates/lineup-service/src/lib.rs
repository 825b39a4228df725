//! Queue operations for the Lineup walk-in service.
//!
//! [`QueueService`] implements join/leave/position/length/dequeue against a
//! versioned [`lineup_storage::DocumentStore`]. Correctness under concurrent
//! mutation is delegated entirely to the store's conditional write: every
//! operation is a single read-mutate-conditional-write cycle that either
//! succeeds outright or fails fast with [`QueueError::Contention`]. The
//! service never retries a lost race; retrying from a fresh read is the
//! caller's job. [`availability`] holds the pure spot-capacity calculation.

pub mod availability;
pub mod error;
pub mod queue_service;

pub use availability::{AvailabilityWindow, available_spots};
pub use error::QueueError;
pub use queue_service::{QueueService, QueueSnapshot};
