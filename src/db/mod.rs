// ABOUTME: Database module exports for Sakila Charts
// ABOUTME: Query runner seam plus the SQL Server and SQLite implementations

pub mod sqlite;
pub mod sqlserver;

use thiserror::Error;

use crate::config::{ConnectionProfile, DatabaseType};
use crate::models::ResultSet;

pub use sqlite::{SqliteError, SqliteRunner};
pub use sqlserver::{SqlServerConnection, SqlServerError, SqlServerRunner};

/// Failure while executing a bound query, wrapping the driver's error
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("SQL Server: {0}")]
    SqlServer(#[from] SqlServerError),
    #[error("SQLite: {0}")]
    Sqlite(#[from] SqliteError),
    #[error("{0}")]
    Driver(String),
}

/// Runs finished query text and hands back the rows
pub trait QueryRunner {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, ExecutionError>;
}

impl<R: QueryRunner + ?Sized> QueryRunner for Box<R> {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, ExecutionError> {
        (**self).execute(sql)
    }
}

/// Open a runner for whichever database the profile points at
pub fn connect(profile: &ConnectionProfile) -> Result<Box<dyn QueryRunner>, ExecutionError> {
    log::info!(
        "Connecting to {} database '{}' using profile '{}'",
        profile.db_type,
        profile.database,
        profile.name
    );
    let runner: Box<dyn QueryRunner> = match profile.db_type {
        DatabaseType::SqlServer => Box::new(SqlServerRunner::connect(profile)?),
        DatabaseType::Sqlite => Box::new(SqliteRunner::open(&profile.database)?),
    };
    Ok(runner)
}
