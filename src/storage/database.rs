//! # SQL Execution Interface
//!
//! Thin wrapper over a single SQLite connection. Models build their SQL with
//! [`insert_query`] or by hand and run it through `select_all`, `select_one`
//! and `exec`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};

use crate::storage::StoreError;
use crate::storage::migrations;

/// A statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Build an `INSERT` for `table` from ordered `(column, value)` pairs.
pub fn insert_query(table: &str, record: Vec<(&str, Value)>) -> SqlQuery {
    let (columns, params): (Vec<&str>, Vec<Value>) = record.into_iter().unzip();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();

    SqlQuery {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

/// Migrated SQLite database guarded by a mutex.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and bring the schema up to date.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!("Opened database at {}", path.display());
        Self::from_connection(conn)
    }

    /// In-memory database, migrated. Contents vanish with the value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StoreError> {
        let version = migrations::migrate(&mut conn)?;
        info!("Database schema at version {}", version);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-query leaves the connection itself usable
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a query and map every row.
    pub fn select_all<T, F>(&self, sql: &str, params: &[Value], map_row: F) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Run a query and map the first row, if any.
    pub fn select_one<T, F>(&self, sql: &str, params: &[Value], map_row: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.lock();
        let row = conn
            .query_row(sql, params_from_iter(params.iter()), map_row)
            .optional()?;
        Ok(row)
    }

    /// Execute a statement. Returns the number of rows affected.
    pub fn exec(&self, sql: &str, params: &[Value]) -> Result<usize, StoreError> {
        let conn = self.lock();
        Ok(conn.execute(sql, params_from_iter(params.iter()))?)
    }
}
