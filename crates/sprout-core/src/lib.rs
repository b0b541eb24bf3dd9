//! Sprout Core - domain entities and invariants
//!
//! This crate provides the in-memory half of the Sprout persistence layer:
//! - Lifecycle base shared by every entity (identity, timestamps, sync status)
//! - `User` profile entity
//! - `Sprout` aggregate with its bounded, densely ordered affirmation and trigger lists
//! - Domain error taxonomy and the stable `ExError` facility used across crates
//! - Aggregate limits configuration
//! - Structured logging facility

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use config::SproutLimits;
pub use errors::{ExError, ExErrorKind, Result, SproutError};
pub use model::{
    Affirmation, AuthProfile, ChildKind, Entity, Lifecycle, ListItem, Sprout, SproutProps,
    SyncStatus, Trigger, User, UserProps,
};
