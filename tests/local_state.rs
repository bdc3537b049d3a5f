use repertoire_viewer::db::{get_value, save_preferences, save_progress};
use repertoire_viewer::models::ViewMode;
use repertoire_viewer::{
    load_preferences, load_progress, open_store, Guide, Preferences, Progress, ProgressBook,
    SortKey,
};
use tempfile::tempdir;

#[test]
fn preferences_and_progress_survive_reopening_the_store() {
    let dir = tempdir().expect("temporary directory");
    let data_dir = dir.path().join("nested").join("data");

    {
        let conn = open_store(&data_dir).expect("store opened");
        let prefs = Preferences {
            guide: Guide::Notes,
            view: ViewMode::Table,
            sort: SortKey::GenreAsc,
            level_min: 2,
        };
        save_preferences(&conn, &prefs).expect("preferences saved");

        let mut progress = ProgressBook::default();
        progress.toggle("gavotte", Progress::Doing);
        progress.toggle("minuet 1", Progress::Done);
        save_progress(&conn, &progress).expect("progress saved");
    }

    let conn = open_store(&data_dir).expect("store reopened");
    let prefs = load_preferences(&conn).expect("preferences loaded");
    assert_eq!(prefs.guide, Guide::Notes);
    assert_eq!(prefs.view, ViewMode::Table);
    assert_eq!(prefs.sort, SortKey::GenreAsc);
    assert_eq!(prefs.level_min, 2);

    let progress = load_progress(&conn).expect("progress loaded");
    assert_eq!(progress.get("gavotte"), Some(Progress::Doing));
    assert_eq!(progress.done_count(), 1);

    assert_eq!(
        get_value(&conn, "progress_v1").expect("raw value read").as_deref(),
        Some(r#"{"gavotte":"doing","minuet 1":"done"}"#)
    );
}

#[test]
fn fresh_store_starts_with_defaults() {
    let dir = tempdir().expect("temporary directory");
    let conn = open_store(dir.path()).expect("store opened");
    assert_eq!(load_preferences(&conn).expect("preferences loaded"), Preferences::default());
    assert!(load_progress(&conn).expect("progress loaded").is_empty());
}
