//! SQLite implementation of the storage adapter contract

#![allow(clippy::result_large_err)]

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Statement, Transaction, TransactionBehavior};

use super::{Row, RunResult, SqlValue, StorageAdapter, TransactionalAdapter};
use crate::errors::{from_rusqlite, row_decode, Result};

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            SqlValue::Real(value) => ToSqlOutput::Owned(Value::Real(*value)),
            SqlValue::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            SqlValue::Bool(value) => ToSqlOutput::Owned(Value::Integer(i64::from(*value))),
            SqlValue::Blob(value) => ToSqlOutput::Borrowed(ValueRef::Blob(value)),
        })
    }
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn read_row(names: &[String], row: &rusqlite::Row<'_>) -> Result<Row> {
    let mut out = Row::new();
    for (index, name) in names.iter().enumerate() {
        let value = match row.get_ref(index).map_err(from_rusqlite)? {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(value) => SqlValue::Integer(value),
            ValueRef::Real(value) => SqlValue::Real(value),
            ValueRef::Text(bytes) => SqlValue::Text(
                std::str::from_utf8(bytes)
                    .map_err(|e| row_decode(name, &e.to_string()))?
                    .to_string(),
            ),
            ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
        };
        out.push(name.clone(), value);
    }
    Ok(out)
}

/// A bare connection (or a transaction, through `Deref`) is a storage handle
impl StorageAdapter for Connection {
    fn get_first(&self, sql: &str, params: &[SqlValue]) -> Result<Option<Row>> {
        let mut stmt = self.prepare(sql).map_err(from_rusqlite)?;
        let names = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(from_rusqlite)?;

        let first = match rows.next().map_err(from_rusqlite)? {
            Some(row) => Some(read_row(&names, row)?),
            None => None,
        };
        Ok(first)
    }

    fn get_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let mut stmt = self.prepare(sql).map_err(from_rusqlite)?;
        let names = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(from_rusqlite)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            out.push(read_row(&names, row)?);
        }
        Ok(out)
    }

    fn run(&self, sql: &str, params: &[SqlValue]) -> Result<RunResult> {
        let changes = self
            .execute(sql, params_from_iter(params.iter()))
            .map_err(from_rusqlite)?;
        Ok(RunResult {
            last_insert_id: self.last_insert_rowid(),
            changes,
        })
    }

    fn exec(&self, sql: &str) -> Result<()> {
        self.execute_batch(sql).map_err(from_rusqlite)
    }
}

/// Storage adapter owning a single SQLite connection
///
/// All multi-statement mutations go through
/// [`TransactionalAdapter::with_exclusive_transaction`], which serializes
/// against every other transaction on the database.
#[derive(Debug)]
pub struct SqliteAdapter {
    conn: Connection,
}

impl SqliteAdapter {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StorageAdapter for SqliteAdapter {
    fn get_first(&self, sql: &str, params: &[SqlValue]) -> Result<Option<Row>> {
        self.conn.get_first(sql, params)
    }

    fn get_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        self.conn.get_all(sql, params)
    }

    fn run(&self, sql: &str, params: &[SqlValue]) -> Result<RunResult> {
        self.conn.run(sql, params)
    }

    fn exec(&self, sql: &str) -> Result<()> {
        self.conn.exec(sql)
    }
}

impl TransactionalAdapter for SqliteAdapter {
    fn with_exclusive_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StorageAdapter) -> Result<T>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Exclusive)
            .map_err(from_rusqlite)?;

        // Dropping `tx` on the error path rolls back.
        let value = f(&*tx)?;

        tx.commit().map_err(from_rusqlite)?;
        Ok(value)
    }
}
