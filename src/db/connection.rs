use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".repertoire-viewer";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "store.sqlite";

/// Open (creating if needed) the store inside `data_dir` and make sure the
/// key-value table exists.
pub fn open_store(data_dir: &Path) -> Result<Connection> {
    fs::create_dir_all(data_dir).context("failed to create data directory")?;

    let db_path = data_dir.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    tracing::debug!(path = %db_path.display(), "store opened");
    Ok(conn)
}

/// Run the lazy migration. Safe to call on every start.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv table")?;
    Ok(())
}

/// Resolve `~/.repertoire-viewer`, used when no data directory is configured.
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
