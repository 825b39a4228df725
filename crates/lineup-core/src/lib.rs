//! Core domain types for the Lineup queue service: the queue aggregate,
//! document id handling, and the shared error type.

pub mod error;
pub mod id;
pub mod queue;

pub use error::{CoreError, Result};
pub use id::{IdError, generate_id, validate_id};
pub use queue::{QUEUE_DOC_TYPE, Queue, QueueEntry, QueueMode, QueueStatus};
