use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::kv::{get_value, set_value};
use crate::models::{Progress, ProgressBook};

const PROGRESS_KEY: &str = "progress_v1";

/// Load the progress book. Unreadable JSON is logged and treated as empty;
/// entries holding an unknown state are dropped one by one.
pub fn load_progress(conn: &Connection) -> Result<ProgressBook> {
    let Some(raw) = get_value(conn, PROGRESS_KEY)? else {
        return Ok(ProgressBook::default());
    };

    let entries = match serde_json::from_str::<Option<BTreeMap<String, serde_json::Value>>>(&raw) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable progress data");
            return Ok(ProgressBook::default());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<Progress>(value) {
            Ok(state) => Some((key, state)),
            Err(_) => {
                tracing::debug!(key = %key, "skipping unknown progress state");
                None
            }
        })
        .collect())
}

pub fn save_progress(conn: &Connection, book: &ProgressBook) -> Result<()> {
    let raw = serde_json::to_string(book).context("failed to serialize progress")?;
    set_value(conn, PROGRESS_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn progress_round_trips() {
        let conn = store();
        let mut book = ProgressBook::default();
        book.toggle("minuet 1", Progress::Doing);
        book.toggle("gavotte", Progress::Done);
        save_progress(&conn, &book).unwrap();

        assert_eq!(load_progress(&conn).unwrap(), book);
    }

    #[test]
    fn corrupt_or_null_progress_resets() {
        let conn = store();
        set_value(&conn, PROGRESS_KEY, "{not json").unwrap();
        assert!(load_progress(&conn).unwrap().is_empty());

        set_value(&conn, PROGRESS_KEY, "null").unwrap();
        assert!(load_progress(&conn).unwrap().is_empty());
    }

    #[test]
    fn unknown_states_are_skipped() {
        let conn = store();
        set_value(&conn, PROGRESS_KEY, r#"{"a":"done","b":"paused","c":3}"#).unwrap();
        let book = load_progress(&conn).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("a"), Some(Progress::Done));
    }
}
