// ABOUTME: Connection commands for the Sakila Charts CLI
// ABOUTME: Verifies that the selected profile can reach its database

use anyhow::Result;

use super::Context;
use crate::config::DatabaseType;
use crate::db::{SqlServerRunner, SqliteRunner};

/// Connect with the selected profile and report what answered
pub fn check(ctx: &Context) -> Result<()> {
    let profile = &ctx.profile;
    match profile.db_type {
        DatabaseType::SqlServer => {
            let mut runner = SqlServerRunner::connect(profile)?;
            let version = runner.test_connection()?;
            let first_line = version.lines().next().unwrap_or("Unknown");
            println!(
                "Connected to {}:{} ({}) as {}",
                profile.host, profile.port, profile.database, profile.username
            );
            println!("{}", first_line.trim());
        }
        DatabaseType::Sqlite => {
            let runner = SqliteRunner::open(&profile.database)?;
            let version: String = runner
                .connection()
                .query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
            println!("Opened {} (SQLite {})", profile.database, version);
        }
    }
    Ok(())
}
