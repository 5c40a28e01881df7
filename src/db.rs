use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::models::Grouping;

pub const DB_FILE: &str = "tally.db";

/// Plain key-value string storage; one row per key.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT DEFAULT (datetime('now'))
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Open (creating if needed) the store inside `data_dir`.
pub fn open_store(data_dir: &Path) -> Result<Connection> {
    std::fs::create_dir_all(data_dir)?;
    let conn = get_connection(&data_dir.join(DB_FILE))?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM storage WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Groupings, stored as a JSON array under the data source name
// ---------------------------------------------------------------------------

pub fn load_groupings(conn: &Connection, source: &str) -> Result<Vec<Grouping>> {
    let json = get_item(conn, source)?.unwrap_or_else(|| "[]".to_string());
    let groupings: Vec<Grouping> = serde_json::from_str(&json)?;
    tracing::debug!(source, count = groupings.len(), "loaded groupings");
    Ok(groupings)
}

pub fn save_groupings(conn: &Connection, source: &str, groupings: &[Grouping]) -> Result<()> {
    let json = serde_json::to_string(groupings)?;
    set_item(conn, source, &json)?;
    tracing::debug!(source, count = groupings.len(), "saved groupings");
    Ok(())
}
