//! Storage adapter contract
//!
//! The minimal capability set the repositories and the migration runner need
//! from the storage engine: parameterized queries returning column-named rows,
//! statement execution, raw batch execution, and exclusive transactions.

mod sqlite;

pub use sqlite::SqliteAdapter;

use chrono::{DateTime, Utc};

use crate::errors::{row_decode, Result};

/// Primitive value bound to or read from a column
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Timestamp stored as integer epoch milliseconds
    pub fn timestamp_millis(ts: DateTime<Utc>) -> Self {
        SqlValue::Integer(ts.timestamp_millis())
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Column name -> value mapping, kept in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Set a column, replacing an existing value of the same name
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn require(&self, column: &str) -> Result<&SqlValue> {
        self.get(column)
            .ok_or_else(|| row_decode(column, "missing column"))
    }

    /// Required text column
    ///
    /// # Errors
    /// `RowDecode` if the column is missing, NULL, or not text
    pub fn text(&self, column: &str) -> Result<String> {
        self.opt_text(column)?
            .ok_or_else(|| row_decode(column, "unexpected NULL"))
    }

    /// Nullable text column
    ///
    /// # Errors
    /// `RowDecode` if the column is missing or holds a non-text value
    pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
        match self.require(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(value) => Ok(Some(value.clone())),
            other => Err(row_decode(column, &format!("expected text, got {:?}", other))),
        }
    }

    /// Required integer column
    ///
    /// # Errors
    /// `RowDecode` if the column is missing, NULL, or not an integer
    pub fn integer(&self, column: &str) -> Result<i64> {
        match self.require(column)? {
            SqlValue::Integer(value) => Ok(*value),
            SqlValue::Bool(value) => Ok(i64::from(*value)),
            other => Err(row_decode(
                column,
                &format!("expected integer, got {:?}", other),
            )),
        }
    }

    /// Integer epoch-millisecond column as a UTC timestamp
    ///
    /// # Errors
    /// `RowDecode` if the column is not an integer or out of range
    pub fn timestamp(&self, column: &str) -> Result<DateTime<Utc>> {
        let millis = self.integer(column)?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| row_decode(column, &format!("timestamp {} out of range", millis)))
    }
}

/// Receipt of a single executed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub last_insert_id: i64,
    pub changes: usize,
}

/// Query and statement capabilities of a storage handle
///
/// Implemented by connections and by transaction-scoped handles alike.
pub trait StorageAdapter {
    /// First row of the result set, if any
    fn get_first(&self, sql: &str, params: &[SqlValue]) -> Result<Option<Row>>;

    /// Every row of the result set
    fn get_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;

    /// Execute one statement with bound parameters
    fn run(&self, sql: &str, params: &[SqlValue]) -> Result<RunResult>;

    /// Execute raw SQL without parameters (DDL, pragmas, batches)
    fn exec(&self, sql: &str) -> Result<()>;
}

/// A storage handle able to open exclusive transactions
pub trait TransactionalAdapter: StorageAdapter {
    /// Run `f` inside one exclusive transaction
    ///
    /// `f` receives a transaction-scoped handle. The transaction commits when
    /// `f` returns `Ok` and rolls back when it returns `Err`; the error is
    /// returned unchanged.
    fn with_exclusive_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StorageAdapter) -> Result<T>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::ExErrorKind;

    #[test]
    fn test_row_push_replaces_existing_column() {
        let mut row = Row::new().with("id", "a").with("color", "red");
        row.push("color", "blue");

        assert_eq!(row.len(), 2);
        assert_eq!(row.text("color").unwrap(), "blue");
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::new()
            .with("name", None::<String>)
            .with("position", 3u32)
            .with("created_at", 1_700_000_000_123i64);

        assert_eq!(row.opt_text("name").unwrap(), None);
        assert_eq!(row.integer("position").unwrap(), 3);
        assert_eq!(
            row.timestamp("created_at").unwrap().timestamp_millis(),
            1_700_000_000_123
        );
    }

    #[test]
    fn test_row_decode_errors() {
        let row = Row::new().with("name", None::<String>).with("n", 1i64);

        assert_eq!(row.text("name").unwrap_err().kind(), ExErrorKind::RowDecode);
        assert_eq!(row.text("n").unwrap_err().kind(), ExErrorKind::RowDecode);
        assert_eq!(row.integer("missing").unwrap_err().kind(), ExErrorKind::RowDecode);
    }

    #[test]
    fn test_column_order_preserved() {
        let row = Row::new().with("id", "x").with("b", 1i64).with("a", 2i64);
        let names: Vec<&str> = row.columns().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "b", "a"]);
    }
}
