//! Migration framework
//!
//! Provides:
//! - Version-tracked runner (SQLite `user_version`), one exclusive transaction per run
//! - Idempotent application: steps below the stored version never run again
//! - Embedded schema steps

mod embedded;
mod runner;

pub use embedded::schema_steps;
pub use runner::{apply_migrations, read_schema_version, run_migrations, MigrationReport, MigrationStep};
