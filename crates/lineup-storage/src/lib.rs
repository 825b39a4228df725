//! Storage abstraction layer for the Lineup queue service.
//!
//! Defines the [`DocumentStore`] trait that all backends implement, the
//! [`StoredDocument`] envelope returned from every read and write, and the
//! [`StorageError`] taxonomy. The version id carried on every
//! `StoredDocument` is the compare-and-swap token used for optimistic
//! concurrency: conditional updates fail with
//! [`StorageError::VersionConflict`] when the supplied token is stale.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::DocumentStore;
pub use types::{SearchParams, StoredDocument};
