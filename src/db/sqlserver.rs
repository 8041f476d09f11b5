// ABOUTME: SQL Server connection management using tiberius
// ABOUTME: Connects from a profile, runs report queries, and converts rows into cells

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tiberius::{AuthMethod, Client, ColumnData, Config, FromSql};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::{ExecutionError, QueryRunner};
use crate::config::ConnectionProfile;
use crate::models::{Cell, ResultSet};

#[derive(Error, Debug)]
pub enum SqlServerError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Tiberius error: {0}")]
    Tiberius(#[from] tiberius::error::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct SqlServerConnection {
    client: Client<Compat<TcpStream>>,
}

impl SqlServerConnection {
    /// Connect to SQL Server using a connection profile
    pub async fn connect(profile: &ConnectionProfile) -> Result<Self, SqlServerError> {
        let mut config = Config::new();
        config.host(&profile.host);
        config.port(profile.port);
        config.database(&profile.database);
        config.authentication(AuthMethod::sql_server(&profile.username, &profile.password));

        if profile.trust_certificate {
            config.trust_cert();
        }

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| SqlServerError::ConnectionFailed(e.to_string()))?;

        tcp.set_nodelay(true)?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| SqlServerError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Test connection by querying SQL Server version
    pub async fn test_connection(&mut self) -> Result<String, SqlServerError> {
        let row = self
            .client
            .simple_query("SELECT @@VERSION")
            .await?
            .into_row()
            .await?
            .ok_or_else(|| SqlServerError::QueryFailed("No version returned".to_string()))?;

        let version: &str = row.get(0).unwrap_or("Unknown");
        Ok(version.to_string())
    }

    /// Run a query and collect the first result set
    pub async fn query(&mut self, sql: &str) -> Result<ResultSet, SqlServerError> {
        let mut stream = self.client.simple_query(sql).await?;

        let columns: Vec<String> = stream
            .columns()
            .await?
            .map(|columns| columns.iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows = stream
            .into_first_result()
            .await?
            .into_iter()
            .map(|row| row.into_iter().map(cell_from_column).collect())
            .collect();

        Ok(ResultSet::new(columns, rows))
    }
}

fn temporal<'a, T>(data: &'a ColumnData<'static>) -> Option<Cell>
where
    T: FromSql<'a> + ToString,
{
    T::from_sql(data)
        .ok()
        .flatten()
        .map(|value| Cell::Text(value.to_string()))
}

/// Map a TDS value onto a cell. Binary and XML columns come through as nulls.
fn cell_from_column(data: ColumnData<'static>) -> Cell {
    let cell = match &data {
        ColumnData::U8(v) => v.map(|v| Cell::Int(v.into())),
        ColumnData::I16(v) => v.map(|v| Cell::Int(v.into())),
        ColumnData::I32(v) => v.map(|v| Cell::Int(v.into())),
        ColumnData::I64(v) => v.map(Cell::Int),
        ColumnData::F32(v) => v.map(|v| Cell::Float(v.into())),
        ColumnData::F64(v) => v.map(Cell::Float),
        ColumnData::Bit(v) => v.map(|v| Cell::Int(v.into())),
        ColumnData::Numeric(v) => v.map(|v| Cell::Float(f64::from(v))),
        ColumnData::String(v) => v.as_ref().map(|v| Cell::Text(v.to_string())),
        ColumnData::Guid(v) => v.map(|v| Cell::Text(v.to_string())),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            temporal::<NaiveDateTime>(&data)
        }
        ColumnData::Date(_) => temporal::<NaiveDate>(&data),
        ColumnData::Time(_) => temporal::<NaiveTime>(&data),
        ColumnData::DateTimeOffset(_) => temporal::<DateTime<FixedOffset>>(&data),
        _ => None,
    };
    cell.unwrap_or(Cell::Null)
}

/// Blocking wrapper so report execution stays synchronous.
///
/// Owns a current-thread runtime and drives each query to completion on it.
pub struct SqlServerRunner {
    runtime: Runtime,
    connection: SqlServerConnection,
}

impl SqlServerRunner {
    pub fn connect(profile: &ConnectionProfile) -> Result<Self, SqlServerError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let connection = runtime.block_on(SqlServerConnection::connect(profile))?;
        Ok(Self {
            runtime,
            connection,
        })
    }

    pub fn test_connection(&mut self) -> Result<String, SqlServerError> {
        self.runtime.block_on(self.connection.test_connection())
    }
}

impl QueryRunner for SqlServerRunner {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, ExecutionError> {
        Ok(self.runtime.block_on(self.connection.query(sql))?)
    }
}
