//! Search, level threshold, and ordering for both the cards and table views.
//!
//! Cards work on aggregated [`SongRecord`]s while the table works on raw feed
//! rows; both go through the [`Listing`] trait so they share one filter and
//! one comparator.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::catalog::{cell, columns, parse_stars};
use crate::models::{SongRecord, SortKey};

/// The fields search and ordering look at.
pub trait Listing {
    fn name(&self) -> &str;
    fn artist(&self) -> &str;
    fn genre(&self) -> &str;
    fn level(&self) -> u32;
}

impl Listing for SongRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn artist(&self) -> &str {
        &self.artist
    }

    fn genre(&self) -> &str {
        &self.genre
    }

    fn level(&self) -> u32 {
        self.level_num
    }
}

impl Listing for Vec<String> {
    fn name(&self) -> &str {
        cell(self, columns::NAME)
    }

    fn artist(&self) -> &str {
        cell(self, columns::ARTIST)
    }

    fn genre(&self) -> &str {
        cell(self, columns::GENRE)
    }

    fn level(&self) -> u32 {
        parse_stars(cell(self, columns::LEVEL))
    }
}

/// Case-insensitive substring match over `name artist genre`. A blank query
/// matches everything.
pub fn matches_search<L: Listing + ?Sized>(item: &L, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let haystack = format!("{} {} {}", item.name(), item.artist(), item.genre()).to_lowercase();
    haystack.contains(&query.to_lowercase())
}

/// Keep items at or above `level_min` that match `query`, then order them.
pub fn select<'a, L: Listing>(
    items: &'a [L],
    level_min: u32,
    query: &str,
    sort: &SortKey,
) -> Vec<&'a L> {
    let mut selected: Vec<&L> = items
        .iter()
        .filter(|item| item.level() >= level_min)
        .filter(|item| matches_search(*item, query))
        .collect();
    sort_items(&mut selected, sort);
    selected
}

/// Stable sort by `key`. Unknown keys leave the order untouched.
pub fn sort_items<L: Listing>(items: &mut [&L], key: &SortKey) {
    match key {
        SortKey::NameAsc => items.sort_by(|a, b| collate(a.name(), b.name())),
        SortKey::NameDesc => items.sort_by(|a, b| collate(b.name(), a.name())),
        SortKey::LevelAsc => items.sort_by(|a, b| {
            a.level()
                .cmp(&b.level())
                .then_with(|| collate(a.name(), b.name()))
        }),
        SortKey::LevelDesc => items.sort_by(|a, b| {
            b.level()
                .cmp(&a.level())
                .then_with(|| collate(a.name(), b.name()))
        }),
        SortKey::GenreAsc => items.sort_by(|a, b| collate(a.genre(), b.genre())),
        SortKey::Unknown(_) => {}
    }
}

/// Spanish collation at base strength: case and accents are ignored, but `ñ`
/// is its own letter sorted right after `n`. Spaces, punctuation, and symbols
/// sort before digits, and digits before letters, so titles such as
/// "¡Viva España!" lead the list.
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_weights(a).cmp(primary_weights(b))
}

/// Bit position of the character class above the per-character weight.
const CLASS_SHIFT: u32 = 23;

fn primary_weights(text: &str) -> impl Iterator<Item = u32> + '_ {
    text.chars()
        .flat_map(char::to_lowercase)
        .flat_map(|ch| {
            if ch == 'ñ' {
                vec![weight('n') + 1]
            } else {
                ch.to_string()
                    .nfd()
                    .filter(|c| !is_combining_mark(*c))
                    .map(weight)
                    .collect()
            }
        })
}

fn weight(c: char) -> u32 {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class << CLASS_SHIFT) | (u32::from(c) * 2)
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}
