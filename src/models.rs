//! Domain models shared by the aggregator, the local store, and the TUI. The
//! types stay light-weight data holders; parsing and merging rules live in
//! `catalog`, ordering rules in `filter`.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Values starting with an http(s) scheme are opened externally; anything else
/// is shown as literal text.
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("link pattern compiles"));

/// One of the three resource columns attached to every song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Guide {
    #[default]
    Numbers,
    Notes,
    Score,
}

impl Guide {
    pub const ALL: [Guide; 3] = [Guide::Numbers, Guide::Notes, Guide::Score];

    /// Identifier used for persistence. These are the spreadsheet column
    /// letters, so existing stored preferences stay readable.
    pub fn id(self) -> &'static str {
        match self {
            Guide::Numbers => "F",
            Guide::Notes => "G",
            Guide::Score => "H",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Guide::ALL.into_iter().find(|guide| guide.id() == id)
    }

    /// Column of the CSV feed holding this guide.
    pub fn column(self) -> usize {
        match self {
            Guide::Numbers => 5,
            Guide::Notes => 6,
            Guide::Score => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Guide::Numbers => "Números",
            Guide::Notes => "Notas",
            Guide::Score => "Partitura",
        }
    }

    /// Next guide in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Guide::Numbers => Guide::Notes,
            Guide::Notes => Guide::Score,
            Guide::Score => Guide::Numbers,
        }
    }
}

impl fmt::Display for Guide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Render-time interpretation of a guide value. Never stored: the record keeps
/// the raw string and callers classify it when they display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<'a> {
    Missing,
    Link(&'a str),
    Text(&'a str),
}

impl<'a> Resource<'a> {
    pub fn classify(value: &'a str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Resource::Missing
        } else if is_link(value) {
            Resource::Link(value)
        } else {
            Resource::Text(value)
        }
    }
}

pub fn is_link(value: &str) -> bool {
    LINK_PATTERN.is_match(value.trim())
}

/// A deduplicated song aggregated from one or more feed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    /// Normalized name; unique across the repertoire.
    pub key: String,
    pub name: String,
    pub artist: String,
    pub genre: String,
    /// Literal star text from the row with the highest star count.
    pub level_stars: String,
    pub level_num: u32,
    pub content: String,
    /// Raw guide values. A guide without an entry has no value yet.
    pub versions: BTreeMap<Guide, String>,
}

impl SongRecord {
    /// Trimmed guide value, or an empty string when the guide is missing.
    pub fn version(&self, guide: Guide) -> &str {
        self.versions
            .get(&guide)
            .map(|value| value.trim())
            .unwrap_or("")
    }

    pub fn resource(&self, guide: Guide) -> Resource<'_> {
        Resource::classify(self.version(guide))
    }

    pub fn has_version(&self, guide: Guide) -> bool {
        !self.version(guide).is_empty()
    }

    /// `artist · genre · stars` with an em-dash placeholder for blank fields.
    pub fn meta_line(&self) -> String {
        format!(
            "{} · {} · {}",
            or_placeholder(&self.artist),
            or_placeholder(&self.genre),
            or_placeholder(&self.level_stars)
        )
    }
}

pub(crate) fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "—"
    } else {
        value
    }
}

/// Everything one successful fetch produces.
#[derive(Debug, Clone, Default)]
pub struct Repertoire {
    /// Header labels, used by the table view.
    pub header: Vec<String>,
    /// Data rows in feed order, header excluded.
    pub rows: Vec<Vec<String>>,
    pub songs: Vec<SongRecord>,
}

impl Repertoire {
    pub fn find(&self, key: &str) -> Option<&SongRecord> {
        self.songs.iter().find(|song| song.key == key)
    }

    pub fn header_label(&self, column: usize) -> &str {
        self.header.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Layout used to present the repertoire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::Table => "table",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cards" => Some(ViewMode::Cards),
            "table" => Some(ViewMode::Table),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        }
    }
}

/// Ordering applied to cards and table rows.
///
/// Stored values that do not name a known ordering are preserved as
/// `Unknown` so they round-trip through the store; sorting with them keeps the
/// feed order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    LevelAsc,
    LevelDesc,
    GenreAsc,
    Unknown(String),
}

impl SortKey {
    pub const CYCLE: [SortKey; 5] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::LevelAsc,
        SortKey::LevelDesc,
        SortKey::GenreAsc,
    ];

    pub fn parse(value: &str) -> Self {
        match value {
            "name-asc" => SortKey::NameAsc,
            "name-desc" => SortKey::NameDesc,
            "level-asc" => SortKey::LevelAsc,
            "level-desc" => SortKey::LevelDesc,
            "genre-asc" => SortKey::GenreAsc,
            other => SortKey::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::LevelAsc => "level-asc",
            SortKey::LevelDesc => "level-desc",
            SortKey::GenreAsc => "genre-asc",
            SortKey::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SortKey::NameAsc => "Name A→Z",
            SortKey::NameDesc => "Name Z→A",
            SortKey::LevelAsc => "Level ↑",
            SortKey::LevelDesc => "Level ↓",
            SortKey::GenreAsc => "Genre A→Z",
            SortKey::Unknown(raw) => raw,
        }
    }

    /// Next ordering in the cycle. Unknown keys restart at `name-asc`.
    pub fn next(&self) -> Self {
        let position = SortKey::CYCLE.iter().position(|key| key == self);
        match position {
            Some(idx) => SortKey::CYCLE[(idx + 1) % SortKey::CYCLE.len()].clone(),
            None => SortKey::NameAsc,
        }
    }
}

/// Highest difficulty the level threshold can be raised to.
pub const MAX_LEVEL: u32 = 5;

/// Scalar preferences restored at startup and written after each change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub guide: Guide,
    pub view: ViewMode,
    pub sort: SortKey,
    pub level_min: u32,
}

/// Per-song practice marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Progress {
    Doing,
    Done,
}

impl Progress {
    pub fn label(self) -> &'static str {
        match self {
            Progress::Doing => "In progress",
            Progress::Done => "Done",
        }
    }
}

/// Progress markers keyed by song key. A song without an entry is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressBook {
    entries: BTreeMap<String, Progress>,
}

impl ProgressBook {
    pub fn get(&self, key: &str) -> Option<Progress> {
        self.entries.get(key).copied()
    }

    /// Selecting the active state clears it; selecting the other replaces it.
    /// Returns the state the song ends up in.
    pub fn toggle(&mut self, key: &str, state: Progress) -> Option<Progress> {
        if self.entries.get(key) == Some(&state) {
            self.entries.remove(key);
            None
        } else {
            self.entries.insert(key.to_string(), state);
            Some(state)
        }
    }

    pub fn done_count(&self) -> usize {
        self.entries
            .values()
            .filter(|state| **state == Progress::Done)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Progress)> for ProgressBook {
    fn from_iter<I: IntoIterator<Item = (String, Progress)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
