use anyhow::Result;
use rusqlite::Connection;

use super::kv::{get_value, set_value};
use crate::models::{Guide, Preferences, SortKey, ViewMode};

const GUIDE_KEY: &str = "guide";
const VIEW_KEY: &str = "view";
const SORT_KEY: &str = "sort";
const LEVEL_MIN_KEY: &str = "level_min";

/// Restore the scalar preferences. Missing or unreadable values fall back to
/// their defaults; a stored sort key is kept verbatim even if unknown.
pub fn load_preferences(conn: &Connection) -> Result<Preferences> {
    let mut prefs = Preferences::default();

    if let Some(guide) = get_value(conn, GUIDE_KEY)?.as_deref().and_then(Guide::from_id) {
        prefs.guide = guide;
    }
    if let Some(view) = get_value(conn, VIEW_KEY)?.as_deref().and_then(ViewMode::parse) {
        prefs.view = view;
    }
    if let Some(sort) = get_value(conn, SORT_KEY)?.filter(|raw| !raw.is_empty()) {
        prefs.sort = SortKey::parse(&sort);
    }
    if let Some(level) = get_value(conn, LEVEL_MIN_KEY)? {
        match level.trim().parse::<u32>() {
            Ok(level) => prefs.level_min = level,
            Err(_) => tracing::warn!(value = %level, "ignoring unreadable level threshold"),
        }
    }

    Ok(prefs)
}

pub fn save_preferences(conn: &Connection, prefs: &Preferences) -> Result<()> {
    set_value(conn, GUIDE_KEY, prefs.guide.id())?;
    set_value(conn, VIEW_KEY, prefs.view.as_str())?;
    set_value(conn, SORT_KEY, prefs.sort.as_str())?;
    set_value(conn, LEVEL_MIN_KEY, &prefs.level_min.to_string())?;
    Ok(())
}
