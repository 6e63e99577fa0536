//! # Query Pipeline
//!
//! Transforms that turn a base dataset into the visible one. They always run in
//! the same order:
//!
//! ```text
//! original ──search──▶ snapshot ──filter──▶ ──sort──▶ working set
//! ```
//!
//! - **Search** always starts from the original dataset. Its result is kept by
//!   the session as the search snapshot.
//! - **Filter** and **sort** start from the snapshot when a search is active,
//!   otherwise from a copy of the original. They never re-run search.
//!
//! Every function here takes a slice and returns a new `Vec`; inputs are never
//! reordered or trimmed in place.
//!
//! ## Search
//!
//! A record matches when any of its field values, stringified and lowercased,
//! contains the lowercased query. Each record is tested once, so a record
//! matching several fields still appears once, in its original position.
//! Queries shorter than [`MIN_SEARCH_LEN`] characters do not search at all.
//!
//! ## Sorting
//!
//! Sort keys can be chained: the first key decides, later keys break ties, and
//! the sort is stable so fully tied records keep their incoming order. Records
//! lacking the sorted field go last in either direction.

use crate::error::TableError;
use crate::model::{value_text, Record};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MIN_SEARCH_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    IdAsc,
    IdDesc,
    TitleAsc,
    TitleDesc,
    CompletedAsc,
    CompletedDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::IdAsc,
        SortKey::IdDesc,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::CompletedAsc,
        SortKey::CompletedDesc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            SortKey::IdAsc => "ID_ASC",
            SortKey::IdDesc => "ID_DESC",
            SortKey::TitleAsc => "TITLE_ASC",
            SortKey::TitleDesc => "TITLE_DESC",
            SortKey::CompletedAsc => "COMPLETED_ASC",
            SortKey::CompletedDesc => "COMPLETED_DESC",
        }
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::IdAsc => missing_last(a.id(), b.id(), |x, y| x.cmp(y)),
            SortKey::IdDesc => missing_last(a.id(), b.id(), |x, y| y.cmp(x)),
            SortKey::TitleAsc => missing_last(a.title(), b.title(), |x, y| locale_cmp(x, y)),
            SortKey::TitleDesc => missing_last(a.title(), b.title(), |x, y| locale_cmp(y, x)),
            SortKey::CompletedAsc => missing_last(a.completed(), b.completed(), |x, y| x.cmp(y)),
            SortKey::CompletedDesc => {
                missing_last(a.completed(), b.completed(), |x, y| y.cmp(x))
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SortKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        SortKey::ALL
            .into_iter()
            .find(|key| key.code() == normalized)
            .ok_or_else(|| TableError::InvalidInput(format!("Unknown sort key: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    CompletedTrue,
    CompletedFalse,
}

impl FilterKey {
    pub fn code(&self) -> &'static str {
        match self {
            FilterKey::CompletedTrue => "COMPLETED_TRUE",
            FilterKey::CompletedFalse => "COMPLETED_FALSE",
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FilterKey::CompletedTrue => record.completed() == Some(true),
            FilterKey::CompletedFalse => record.completed() == Some(false),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FilterKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "COMPLETED_TRUE" | "DONE" | "COMPLETED" => Ok(FilterKey::CompletedTrue),
            "COMPLETED_FALSE" | "PENDING" | "OPEN" => Ok(FilterKey::CompletedFalse),
            _ => Err(TableError::InvalidInput(format!("Unknown filter: {}", s))),
        }
    }
}

/// True when `text` is long enough to trigger a search.
pub fn is_search_active(text: &str) -> bool {
    text.chars().count() >= MIN_SEARCH_LEN
}

/// Records matching `text` in any field, or `None` when the query is too short.
pub fn search(records: &[Record], text: &str) -> Option<Vec<Record>> {
    if !is_search_active(text) {
        return None;
    }
    let needle = text.to_lowercase();
    let matched = records
        .iter()
        .filter(|record| {
            record
                .values()
                .any(|value| value_text(value).to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Some(matched)
}

pub fn filter(records: &[Record], key: FilterKey) -> Vec<Record> {
    records.iter().filter(|r| key.matches(r)).cloned().collect()
}

pub fn sort(records: &[Record], key: SortKey) -> Vec<Record> {
    sort_by_keys(records, &[key])
}

/// Stable multi-key sort; an empty key list returns the records unchanged.
pub fn sort_by_keys(records: &[Record], keys: &[SortKey]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    if keys.is_empty() {
        return sorted;
    }
    sorted.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Applies filter then sort on top of `base`.
pub fn compose(base: &[Record], filter_key: Option<FilterKey>, sort_keys: &[SortKey]) -> Vec<Record> {
    match filter_key {
        Some(key) => sort_by_keys(&filter(base, key), sort_keys),
        None => sort_by_keys(base, sort_keys),
    }
}

/// Collation-style title ordering.
///
/// Three levels, each consulted only on a tie in the previous one:
/// 1. base letters: canonical decomposition, accents dropped, case folded
/// 2. accents: unaccented before accented
/// 3. case: lowercase before uppercase
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_order(a, b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_order(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.nfd().collect();
    let b: Vec<char> = b.nfd().collect();
    a.iter()
        .zip(&b)
        .find(|(x, y)| x != y)
        .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(y),
        })
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
