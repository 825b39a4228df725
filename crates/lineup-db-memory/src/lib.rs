//! In-memory document store backend.
//!
//! Backs the [`lineup_storage::DocumentStore`] contract with a process-local
//! map, mainly for tests and single-node deployments. The conditional update
//! performs its version check and insert under one write guard, so among N
//! concurrent writers based on the same read version exactly one wins.

pub mod storage;

pub use storage::InMemoryStore;
