//! Sprout Store - SQLite persistence for Users and Sprout aggregates
//!
//! Provides:
//! - Storage adapter contract (parameterized queries + exclusive transactions)
//!   and its SQLite implementation
//! - Generic single-table repository driven by per-entity row mapping
//! - `UserRepository` and the transactional `SproutRepository`
//! - Version-tracked migration runner with the embedded schema steps
//! - Store configuration and database initialization

pub mod adapter;
pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use adapter::{Row, RunResult, SqlValue, SqliteAdapter, StorageAdapter, TransactionalAdapter};
pub use config::StoreConfig;
pub use errors::Result;
pub use repo::{Repository, SproutRepository, SproutSummary, UserRepository};
