//! Error handling for sprout-store
//!
//! Wraps sprout-core ExError with store-specific helpers

use sprout_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error, keeping the engine's message
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a row decoding error for a column
pub fn row_decode(column: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::RowDecode)
        .with_op("decode_row")
        .with_message(format!("column '{}': {}", column, reason))
}

/// Create the error raised when the runner is handed no steps
pub fn no_migration_steps() -> ExError {
    ExError::new(ExErrorKind::NoMigrationSteps)
        .with_op("run_migrations")
        .with_message("No migration steps")
}

/// Wrap a failure raised while executing the migration step at `step_index`
pub fn migration_failed(step_index: Option<usize>, cause: ExError) -> ExError {
    let err = ExError::new(ExErrorKind::MigrationFailed)
        .with_op("run_migrations")
        .with_message("Failed to run migrations");
    match step_index {
        Some(index) => err.with_step_index(index).with_source(cause),
        None => err.with_source(cause),
    }
}

/// Wrap a failure raised while opening or migrating the database
pub fn storage_init_failed(cause: ExError) -> ExError {
    ExError::new(ExErrorKind::StorageInitFailed)
        .with_op("initialize")
        .with_message("Failed to initialize database")
        .with_source(cause)
}

/// Create a configuration error
pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(reason)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
