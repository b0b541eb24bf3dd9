//! Migration runner
//!
//! Tracks the applied step count in SQLite's `user_version` and applies the
//! pending suffix of the step list inside one exclusive transaction.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use sprout_core::{log_op_end, log_op_error, log_op_start, ExErrorKind};

use crate::adapter::{StorageAdapter, TransactionalAdapter};
use crate::errors::{migration_failed, no_migration_steps, row_decode, Result};
use crate::migrations::embedded::schema_steps;

type ApplyFn = dyn Fn(&dyn StorageAdapter) -> Result<()>;

/// One ordered schema step
///
/// A step's version is its index in the list handed to [`run_migrations`].
pub struct MigrationStep {
    name: &'static str,
    apply: Box<ApplyFn>,
}

impl MigrationStep {
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(&dyn StorageAdapter) -> Result<()> + 'static,
    {
        Self {
            name,
            apply: Box::new(apply),
        }
    }

    /// Step that executes a raw SQL batch
    pub fn sql(name: &'static str, sql: &'static str) -> Self {
        Self::new(name, move |db| db.exec(sql))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, db: &dyn StorageAdapter) -> Result<()> {
        (self.apply)(db)
    }
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Outcome of a runner invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    pub applied: usize,
}

/// Apply the embedded schema steps
pub fn apply_migrations<A: TransactionalAdapter>(db: &A) -> Result<MigrationReport> {
    run_migrations(db, &schema_steps())
}

/// Read `PRAGMA user_version`, treating an absent row as version 0
pub fn read_schema_version(db: &dyn StorageAdapter) -> Result<u32> {
    match db.get_first("PRAGMA user_version", &[])? {
        Some(row) => {
            let version = row.integer("user_version")?;
            u32::try_from(version)
                .map_err(|_| row_decode("user_version", &format!("invalid version {}", version)))
        }
        None => Ok(0),
    }
}

/// Apply `steps[v..]` where `v` is the stored version, then store `v + n`
///
/// Everything runs in one exclusive transaction. A failing step rolls the
/// whole run back, leaves the version untouched, and surfaces as
/// `MigrationFailed` carrying the step index.
///
/// # Errors
/// * `NoMigrationSteps` - `steps` is empty
/// * `MigrationFailed` - a step, the version read, or the version write failed
pub fn run_migrations<A: TransactionalAdapter>(
    db: &A,
    steps: &[MigrationStep],
) -> Result<MigrationReport> {
    if steps.is_empty() {
        return Err(no_migration_steps());
    }

    let start = Instant::now();
    log_op_start!("run_migrations", step_count = steps.len());

    let result = db
        .with_exclusive_transaction(|tx| {
            let from_version = read_schema_version(tx)?;
            let pending = steps.get(from_version as usize..).unwrap_or(&[]);
            if pending.is_empty() {
                return Ok(MigrationReport {
                    from_version,
                    to_version: from_version,
                    applied: 0,
                });
            }

            for (offset, step) in pending.iter().enumerate() {
                let step_index = from_version as usize + offset;
                tracing::debug!(step_index, step = step.name(), "applying migration step");
                step.apply(tx)
                    .map_err(|cause| migration_failed(Some(step_index), cause))?;
            }

            let to_version = from_version + pending.len() as u32;
            tx.exec(&format!("PRAGMA user_version = {}", to_version))?;

            Ok(MigrationReport {
                from_version,
                to_version,
                applied: pending.len(),
            })
        })
        .map_err(|err| match err.kind() {
            ExErrorKind::MigrationFailed => err,
            _ => migration_failed(None, err),
        });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                "run_migrations",
                duration_ms = duration_ms,
                from_version = report.from_version,
                to_version = report.to_version
            );
        }
        Err(err) => {
            log_op_error!(
                "run_migrations",
                err.clone(),
                duration_ms = duration_ms,
                step_index = ?err.step_index()
            );
        }
    }

    result
}
