//! Sprout aggregate repository
//!
//! Persists a Sprout as one `sprouts` row plus its `affirmations` and
//! `triggers` rows. Writes go through one exclusive transaction per call and
//! rewrite the child rows wholesale; reads return either the full aggregate
//! or nothing.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::{DateTime, Utc};
use sprout_core::{
    log_op_end, log_op_error, log_op_start, ChildKind, Entity, ListItem, Sprout, SproutError,
    SproutLimits, SproutProps, SyncStatus,
};

use super::base_repo::read_sync_status;
use crate::adapter::{Row, SqlValue, StorageAdapter, TransactionalAdapter};
use crate::errors::{row_decode, Result};

const SUMMARY_COLUMNS: &str = "s.*, \
     (SELECT text FROM affirmations WHERE sprout_id = s.id ORDER BY position ASC LIMIT 1) \
     AS first_affirmation_text";

/// List-view projection of a Sprout: root columns plus the first affirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SproutSummary {
    pub id: String,
    pub user_id: String,
    pub color: String,
    pub shape_id: String,
    pub hat_id: String,
    pub sync_status: SyncStatus,
    /// Text of the lowest-position affirmation, if any
    pub first_affirmation_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the Sprout aggregate
///
/// `limits` are attached to every rehydrated Sprout.
pub struct SproutRepository<'a, A> {
    db: &'a A,
    limits: SproutLimits,
}

impl<'a, A: TransactionalAdapter> SproutRepository<'a, A> {
    pub fn new(db: &'a A, limits: SproutLimits) -> Self {
        Self { db, limits }
    }

    /// Insert the root row, then every affirmation and trigger row
    ///
    /// # Errors
    /// `Persistence` if any insert fails; nothing is written in that case
    pub fn create(&self, sprout: &Sprout) -> Result<()> {
        log_sizes(sprout);
        logged("sprout_repo.create", sprout.id(), || {
            self.db.with_exclusive_transaction(|tx| {
                tx.run(
                    "INSERT INTO sprouts \
                     (id, user_id, color, shape_id, hat_id, sync_status, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    &[
                        SqlValue::from(sprout.id()),
                        SqlValue::from(sprout.user_id()),
                        SqlValue::from(sprout.color()),
                        SqlValue::from(sprout.shape_id()),
                        SqlValue::from(sprout.hat_id()),
                        SqlValue::from(sprout.sync_status().as_str()),
                        SqlValue::timestamp_millis(sprout.created_at()),
                        SqlValue::timestamp_millis(sprout.updated_at()),
                    ],
                )?;

                insert_children(tx, ChildKind::Affirmation, sprout.id(), sprout.affirmations())?;
                insert_children(tx, ChildKind::Trigger, sprout.id(), sprout.triggers())?;
                Ok(())
            })
        })
    }

    /// Update the root's mutable columns, then delete and re-insert both collections
    ///
    /// # Errors
    /// * `AggregateNotFound` - no root row with this id; nothing is written
    /// * `Persistence` - any statement failed; nothing is written
    pub fn update(&self, sprout: &Sprout) -> Result<()> {
        log_sizes(sprout);
        logged("sprout_repo.update", sprout.id(), || {
            self.db.with_exclusive_transaction(|tx| {
                let updated = tx.run(
                    "UPDATE sprouts SET color = ?1, shape_id = ?2, hat_id = ?3, \
                     sync_status = ?4, updated_at = ?5 WHERE id = ?6",
                    &[
                        SqlValue::from(sprout.color()),
                        SqlValue::from(sprout.shape_id()),
                        SqlValue::from(sprout.hat_id()),
                        SqlValue::from(sprout.sync_status().as_str()),
                        SqlValue::timestamp_millis(sprout.updated_at()),
                        SqlValue::from(sprout.id()),
                    ],
                )?;
                if updated.changes == 0 {
                    return Err(SproutError::AggregateNotFound {
                        sprout_id: sprout.id().to_string(),
                    }
                    .into());
                }

                for kind in [ChildKind::Affirmation, ChildKind::Trigger] {
                    tx.run(
                        &format!("DELETE FROM {} WHERE sprout_id = ?1", kind.table()),
                        &[SqlValue::from(sprout.id())],
                    )?;
                }

                insert_children(tx, ChildKind::Affirmation, sprout.id(), sprout.affirmations())?;
                insert_children(tx, ChildKind::Trigger, sprout.id(), sprout.triggers())?;
                Ok(())
            })
        })
    }

    /// Delete the root row; child rows go with it through the foreign key cascade
    ///
    /// On a connection with foreign keys off the child rows are deleted
    /// explicitly in the same transaction. Deleting an id that does not exist
    /// is not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        logged("sprout_repo.delete", id, || {
            self.db.with_exclusive_transaction(|tx| {
                if !foreign_keys_enforced(tx)? {
                    for kind in [ChildKind::Affirmation, ChildKind::Trigger] {
                        tx.run(
                            &format!("DELETE FROM {} WHERE sprout_id = ?1", kind.table()),
                            &[SqlValue::from(id)],
                        )?;
                    }
                }
                tx.run("DELETE FROM sprouts WHERE id = ?1", &[SqlValue::from(id)])?;
                Ok(())
            })
        })
    }

    /// Load the full aggregate, children ordered by position
    pub fn find(&self, id: &str) -> Result<Option<Sprout>> {
        logged("sprout_repo.find", id, || {
            let Some(row) = self
                .db
                .get_first("SELECT * FROM sprouts WHERE id = ?1", &[SqlValue::from(id)])?
            else {
                return Ok(None);
            };

            let props = props_from_row(&row)?;
            let affirmations = self.load_children(ChildKind::Affirmation, id)?;
            let triggers = self.load_children(ChildKind::Trigger, id)?;

            Ok(Some(Sprout::from_persistence(
                props,
                affirmations,
                triggers,
                self.limits,
            )))
        })
    }

    /// Summary read for one Sprout without loading its collections
    pub fn find_summary(&self, id: &str) -> Result<Option<SproutSummary>> {
        let sql = format!("SELECT {} FROM sprouts s WHERE s.id = ?1", SUMMARY_COLUMNS);
        self.db
            .get_first(&sql, &[SqlValue::from(id)])?
            .map(|row| summary_from_row(&row))
            .transpose()
    }

    /// Summaries of every Sprout owned by `user_id`, newest first
    pub fn find_all_summaries_by_user_id(&self, user_id: &str) -> Result<Vec<SproutSummary>> {
        let sql = format!(
            "SELECT {} FROM sprouts s WHERE s.user_id = ?1 ORDER BY s.created_at DESC",
            SUMMARY_COLUMNS
        );
        self.db
            .get_all(&sql, &[SqlValue::from(user_id)])?
            .iter()
            .map(summary_from_row)
            .collect()
    }

    fn load_children(&self, kind: ChildKind, sprout_id: &str) -> Result<Vec<ListItem>> {
        let sql = format!(
            "SELECT id, text, position FROM {} WHERE sprout_id = ?1 ORDER BY position ASC",
            kind.table()
        );
        self.db
            .get_all(&sql, &[SqlValue::from(sprout_id)])?
            .iter()
            .map(item_from_row)
            .collect()
    }
}

fn logged<T>(op: &'static str, sprout_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    log_op_start!(op, sprout_id = sprout_id);

    let result = f();

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, sprout_id = sprout_id);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, sprout_id = sprout_id);
        }
    }
    result
}

fn log_sizes(sprout: &Sprout) {
    tracing::debug!(
        sprout_id = sprout.id(),
        affirmation_count = sprout.affirmations().len(),
        trigger_count = sprout.triggers().len(),
        "writing sprout aggregate"
    );
}

fn foreign_keys_enforced(tx: &dyn StorageAdapter) -> Result<bool> {
    match tx.get_first("PRAGMA foreign_keys", &[])? {
        Some(row) => Ok(row.integer("foreign_keys")? != 0),
        None => Ok(false),
    }
}

fn insert_children(
    tx: &dyn StorageAdapter,
    kind: ChildKind,
    sprout_id: &str,
    items: &[ListItem],
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (id, sprout_id, text, position) VALUES (?1, ?2, ?3, ?4)",
        kind.table()
    );
    for item in items {
        tx.run(
            &sql,
            &[
                SqlValue::from(item.id()),
                SqlValue::from(sprout_id),
                SqlValue::from(item.text()),
                SqlValue::from(item.position()),
            ],
        )?;
    }
    Ok(())
}

fn item_from_row(row: &Row) -> Result<ListItem> {
    let position = row.integer("position")?;
    let position = u32::try_from(position)
        .map_err(|_| row_decode("position", &format!("invalid position {}", position)))?;
    Ok(ListItem::from_persistence(
        row.text("id")?,
        row.text("text")?,
        position,
    ))
}

fn props_from_row(row: &Row) -> Result<SproutProps> {
    Ok(SproutProps {
        id: row.text("id")?,
        user_id: row.text("user_id")?,
        color: row.text("color")?,
        shape_id: row.text("shape_id")?,
        hat_id: row.text("hat_id")?,
        sync_status: read_sync_status(row)?,
        created_at: row.timestamp("created_at")?,
        updated_at: row.timestamp("updated_at")?,
    })
}

fn summary_from_row(row: &Row) -> Result<SproutSummary> {
    let props = props_from_row(row)?;
    Ok(SproutSummary {
        id: props.id,
        user_id: props.user_id,
        color: props.color,
        shape_id: props.shape_id,
        hat_id: props.hat_id,
        sync_status: props.sync_status,
        first_affirmation_text: row.opt_text("first_affirmation_text")?,
        created_at: props.created_at,
        updated_at: props.updated_at,
    })
}
