// ABOUTME: SQLite query runner using rusqlite
// ABOUTME: Runs report queries against a local Sakila database file

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use super::{ExecutionError, QueryRunner};
use crate::models::{Cell, ResultSet};

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database file not found: {0}")]
    NotFound(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(v) => Cell::Int(v),
            ValueRef::Real(v) => Cell::Float(v),
            ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(_) => Cell::Null,
        }
    }
}

pub struct SqliteRunner {
    conn: Connection,
}

impl SqliteRunner {
    /// Open an existing database file; `:memory:` opens a fresh in-memory database
    pub fn open(path: &str) -> Result<Self, SqliteError> {
        if path == ":memory:" {
            return Ok(Self::from_connection(Connection::open_in_memory()?));
        }
        if !Path::new(path).exists() {
            return Err(SqliteError::NotFound(path.to_string()));
        }
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run a query and collect every row
    pub fn query(&self, sql: &str) -> Result<ResultSet, SqliteError> {
        let mut stmt = self.conn.prepare(sql.trim())?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(Cell::from))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResultSet::new(columns, rows))
    }
}

impl QueryRunner for SqliteRunner {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, ExecutionError> {
        Ok(self.query(sql)?)
    }
}
