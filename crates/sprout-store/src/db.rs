//! Database connection management
//!
//! Opening, pragma configuration, and one-call initialization

#![allow(clippy::result_large_err)]

use std::path::Path;

use rusqlite::Connection;

use crate::adapter::SqliteAdapter;
use crate::config::StoreConfig;
use crate::errors::{from_rusqlite, storage_init_failed, Result};
use crate::migrations::apply_migrations;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<SqliteAdapter> {
    Connection::open(path)
        .map(SqliteAdapter::new)
        .map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<SqliteAdapter> {
    Connection::open_in_memory()
        .map(SqliteAdapter::new)
        .map_err(from_rusqlite)
}

/// Apply connection pragmas
///
/// WAL is skipped for in-memory databases, which always journal in memory.
pub fn configure(db: &SqliteAdapter, config: &StoreConfig) -> Result<()> {
    let conn = db.connection();

    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {};", foreign_keys))
        .map_err(from_rusqlite)?;

    if config.wal && config.database_path.is_some() {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(from_rusqlite)?;
    }

    Ok(())
}

/// Open, configure, and migrate the database described by `config`
///
/// # Errors
/// `StorageInitFailed` wrapping whatever failed underneath
pub fn initialize(config: &StoreConfig) -> Result<SqliteAdapter> {
    let span = tracing::info_span!("initialize", path = ?config.database_path);
    let _guard = span.enter();

    let setup = || -> Result<SqliteAdapter> {
        let db = match &config.database_path {
            Some(path) => open(path)?,
            None => open_in_memory()?,
        };
        configure(&db, config)?;
        let report = apply_migrations(&db)?;
        tracing::info!(
            from_version = report.from_version,
            to_version = report.to_version,
            "database ready"
        );
        Ok(db)
    };

    setup().map_err(storage_init_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::read_schema_version;
    use crate::StorageAdapter;

    #[test]
    fn test_configure_enables_foreign_keys() {
        let db = open_in_memory().unwrap();
        configure(&db, &StoreConfig::in_memory()).unwrap();

        let row = db.get_first("PRAGMA foreign_keys", &[]).unwrap().unwrap();
        assert_eq!(row.integer("foreign_keys").unwrap(), 1);
    }

    #[test]
    fn test_initialize_in_memory() {
        let db = initialize(&StoreConfig::in_memory()).unwrap();
        assert_eq!(read_schema_version(&db).unwrap(), 4);
    }
}
