//! Folds raw feed rows into deduplicated song records.
//!
//! Rows are grouped by normalized name and merged in feed order: the first
//! non-empty artist, genre, content, and guide value win, while the difficulty
//! keeps the highest star count seen. Because both policies depend on order,
//! the fold walks the rows strictly front to back.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Guide, SongRecord};

/// Fixed column layout of the feed.
pub mod columns {
    pub const NAME: usize = 0;
    pub const ARTIST: usize = 1;
    pub const GENRE: usize = 2;
    pub const LEVEL: usize = 3;
    pub const CONTENT: usize = 4;

    /// Columns shown by the table view ahead of the selected guide column.
    pub const FIXED: [usize; 5] = [NAME, ARTIST, GENRE, LEVEL, CONTENT];
}

const FILLED_STAR: char = '★';

/// Count filled star glyphs. Hollow stars (`☆`) do not count, and no clamping
/// is applied.
pub fn parse_stars(text: &str) -> u32 {
    text.chars().filter(|ch| *ch == FILLED_STAR).count() as u32
}

/// Trimmed, lower-cased, with every whitespace run collapsed to one space.
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Cell at `idx`, or an empty string for ragged rows.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Group data rows (header excluded) into one record per normalized name,
/// preserving first-appearance order.
pub fn group_songs(rows: &[Vec<String>]) -> Vec<SongRecord> {
    let mut songs: Vec<SongRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = cell(row, columns::NAME).trim();
        if name.is_empty() {
            continue;
        }

        let key = normalize_key(name);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            songs.push(SongRecord {
                key,
                name: name.to_string(),
                artist: String::new(),
                genre: String::new(),
                level_stars: cell(row, columns::LEVEL).trim().to_string(),
                level_num: parse_stars(cell(row, columns::LEVEL)),
                content: String::new(),
                versions: BTreeMap::new(),
            });
            songs.len() - 1
        });

        merge_row(&mut songs[slot], row);
    }

    tracing::debug!(rows = rows.len(), songs = songs.len(), "grouped feed rows");
    songs
}

fn merge_row(song: &mut SongRecord, row: &[String]) {
    let level_text = cell(row, columns::LEVEL);
    let level = parse_stars(level_text);
    if level > song.level_num {
        song.level_num = level;
        song.level_stars = level_text.trim().to_string();
    }

    fill_if_empty(&mut song.artist, cell(row, columns::ARTIST));
    fill_if_empty(&mut song.genre, cell(row, columns::GENRE));
    fill_if_empty(&mut song.content, cell(row, columns::CONTENT));

    for guide in Guide::ALL {
        let value = cell(row, guide.column()).trim();
        if !value.is_empty() {
            song.versions
                .entry(guide)
                .or_insert_with(|| value.to_string());
        }
    }
}

fn fill_if_empty(slot: &mut String, candidate: &str) {
    if slot.is_empty() {
        let candidate = candidate.trim();
        if !candidate.is_empty() {
            *slot = candidate.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn counts_only_filled_stars() {
        assert_eq!(parse_stars("★★★☆☆"), 3);
        assert_eq!(parse_stars("☆☆☆☆☆"), 0);
        assert_eq!(parse_stars(""), 0);
        assert_eq!(parse_stars("★★★★★★★"), 7);
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_key("  Ode   to\tJoy "), "ode to joy");
        assert_eq!(normalize_key("ODE TO JOY"), "ode to joy");
    }

    #[test]
    fn rows_without_name_are_skipped() {
        let songs = group_songs(&[row(&["   ", "Artist"]), row(&[])]);
        assert!(songs.is_empty());
    }

    #[test]
    fn duplicate_names_merge_into_one_record() {
        let songs = group_songs(&[
            row(&["Minuet 1", "", "Baroque", "★★☆☆☆"]),
            row(&["minuet  1", "Bach", "Classical", "★☆☆☆☆"]),
        ]);
        assert_eq!(songs.len(), 1);
        let song = &songs[0];
        assert_eq!(song.key, "minuet 1");
        assert_eq!(song.name, "Minuet 1");
        assert_eq!(song.artist, "Bach");
        assert_eq!(song.genre, "Baroque");
        assert_eq!(song.level_num, 2);
        assert_eq!(song.level_stars, "★★☆☆☆");
    }

    #[test]
    fn artist_merge_ignores_row_order() {
        let with_artist = row(&["Song", "Someone"]);
        let without_artist = row(&["Song", ""]);
        let forward = group_songs(&[with_artist.clone(), without_artist.clone()]);
        let backward = group_songs(&[without_artist, with_artist]);
        assert_eq!(forward[0].artist, "Someone");
        assert_eq!(backward[0].artist, "Someone");
    }

    #[test]
    fn highest_level_wins_with_its_literal_text() {
        let low = row(&["Song", "", "", " ★☆☆☆☆ "]);
        let high = row(&["Song", "", "", "★★★★☆"]);
        for rows in [vec![low.clone(), high.clone()], vec![high, low]] {
            let songs = group_songs(&rows);
            assert_eq!(songs[0].level_num, 4);
            assert_eq!(songs[0].level_stars, "★★★★☆");
        }
    }

    #[test]
    fn first_non_empty_guide_value_wins() {
        let songs = group_songs(&[
            row(&["Song", "", "", "", "", "", "C D E"]),
            row(&["Song", "", "", "", "", "https://a.example", "later", " "]),
            row(&["Song", "", "", "", "", "https://b.example", "", "sheet"]),
        ]);
        let song = &songs[0];
        assert_eq!(song.version(Guide::Numbers), "https://a.example");
        assert_eq!(song.version(Guide::Notes), "C D E");
        assert_eq!(song.version(Guide::Score), "sheet");
    }

    #[test]
    fn records_keep_first_appearance_order() {
        let songs = group_songs(&[row(&["B"]), row(&["A"]), row(&["b"])]);
        let names: Vec<&str> = songs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
