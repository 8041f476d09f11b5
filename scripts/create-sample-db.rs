// Script to create a small Sakila-shaped SQLite database for local runs
// Run with: cargo run --bin create-sample-db [path]

use rusqlite::Connection;
use std::path::PathBuf;

const SAMPLE_SQL: &str = include_str!("../resources/sakila_mini.sql");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("resources/sakila_mini.db"));

    // Ensure target directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Remove existing if present
    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }

    let conn = Connection::open(&db_path)?;
    conn.execute_batch(SAMPLE_SQL)?;

    for table in ["customer", "film", "rental", "payment"] {
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        println!("{:<10} {} rows", table, count);
    }

    println!("Created sample database at {}", db_path.display());
    println!(
        "Point a profile at it with {{\"type\": \"sqlite\", \"database\": \"{}\"}}",
        db_path.display()
    );
    Ok(())
}
