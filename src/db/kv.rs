use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Read the value stored under `key`, if any.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
    .with_context(|| format!("failed to read stored value '{key}'"))
}

/// Insert or replace the value under `key`.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("failed to store value '{key}'"))?;
    Ok(())
}
