//! Generic single-table repository
//!
//! An entity describes its table and its row mapping once through
//! [`RowMapped`]; `BaseRepository` derives the CRUD statements from that.

#![allow(clippy::result_large_err)]

use std::marker::PhantomData;

use sprout_core::{ExError, ExErrorKind, SyncStatus};

use crate::adapter::{Row, SqlValue, StorageAdapter};
use crate::errors::Result;

/// Bidirectional mapping between an entity and its table row
pub trait RowMapped: Sized {
    /// Table holding one row per entity
    const TABLE: &'static str;

    /// Column map for this entity; must contain an `id` column
    fn to_row(&self) -> Row;

    /// # Errors
    /// `RowDecode` if a column is missing or has the wrong shape
    fn from_row(row: &Row) -> Result<Self>;
}

/// Basic CRUD contract
pub trait Repository<E> {
    fn create(&self, entity: &E) -> Result<()>;

    /// `None` if no row has this id
    fn find(&self, id: &str) -> Result<Option<E>>;

    fn find_all(&self) -> Result<Vec<E>>;

    /// Overwrite every non-id column of the row with this entity's id
    fn update(&self, entity: &E) -> Result<()>;

    /// Deleting an id that does not exist is not an error
    fn delete(&self, id: &str) -> Result<()>;
}

/// CRUD over `E::TABLE`
pub struct BaseRepository<'a, E> {
    db: &'a dyn StorageAdapter,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: RowMapped> BaseRepository<'a, E> {
    pub fn new(db: &'a dyn StorageAdapter) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Handle this repository runs its statements on
    pub fn db(&self) -> &'a dyn StorageAdapter {
        self.db
    }

    /// First entity whose `column` equals `value`
    pub fn find_by(&self, column: &str, value: impl Into<SqlValue>) -> Result<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?1", E::TABLE, column);
        self.db
            .get_first(&sql, &[value.into()])?
            .map(|row| E::from_row(&row))
            .transpose()
    }
}

impl<'a, E: RowMapped> Repository<E> for BaseRepository<'a, E> {
    fn create(&self, entity: &E) -> Result<()> {
        let row = entity.to_row();
        let columns: Vec<&str> = row.columns().map(|(name, _)| name).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let values: Vec<SqlValue> = row.columns().map(|(_, value)| value.clone()).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            columns.join(", "),
            placeholders
        );
        self.db.run(&sql, &values)?;
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Option<E>> {
        self.find_by("id", id)
    }

    fn find_all(&self) -> Result<Vec<E>> {
        let sql = format!("SELECT * FROM {}", E::TABLE);
        self.db
            .get_all(&sql, &[])?
            .iter()
            .map(E::from_row)
            .collect()
    }

    fn update(&self, entity: &E) -> Result<()> {
        let row = entity.to_row();
        let id = row.get("id").cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("update")
                .with_message(format!("{} row has no id column", E::TABLE))
        })?;

        let mut set_clauses = Vec::new();
        let mut values = Vec::new();
        for (name, value) in row.columns().filter(|(name, _)| *name != "id") {
            set_clauses.push(format!("{} = ?", name));
            values.push(value.clone());
        }
        values.push(id);

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            E::TABLE,
            set_clauses.join(", ")
        );
        self.db.run(&sql, &values)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
        self.db.run(&sql, &[SqlValue::from(id)])?;
        Ok(())
    }
}

/// Decode a `sync_status` column; NULL reads as the column default
pub(crate) fn read_sync_status(row: &Row) -> Result<SyncStatus> {
    match row.opt_text("sync_status")? {
        Some(value) => Ok(value.parse::<SyncStatus>()?),
        None => Ok(SyncStatus::Pending),
    }
}
