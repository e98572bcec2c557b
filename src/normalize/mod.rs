//! Artist-credit normalization and shared text helpers.
//!
//! Pure functions, no I/O. Raw credit text as a source renders it
//! ("Mysto & Pizzi feat. Johnny Rose") is parsed into the typed artist
//! list of the canonical schema; the same module owns the whitespace,
//! track-number and display-name conventions every source shares.

use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::model::{Artist, ArtistRole};

/// Splits off featured-artist segments: "A feat. B", "A ft B",
/// "A featuring B". The marker must end in whitespace so that names
/// merely starting with "feat"/"ft" survive intact.
static FEATURE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\b(?:featuring|feat\.?|ft\.?)\s+").unwrap());

/// Separates co-credited artists within one segment.
static ARTIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|&|\bwith\b)\s*").unwrap());

/// Collapse internal whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse one raw artist string into the ordered, typed credit list.
///
/// Main artists come first (in split order), then featured artists (in
/// split order); that ordering is a fixed contract. A string matching a
/// "various artists" alias collapses to the single synthetic marker, and
/// an empty or whitespace-only string contributes nothing.
pub fn split_artist_credits(raw: &str) -> Vec<Artist> {
    let raw = collapse_whitespace(raw);
    if raw.is_empty() {
        return Vec::new();
    }
    if config::VARIOUS_ARTIST_ALIASES.contains(&raw.as_str()) {
        return vec![Artist::various()];
    }

    let mut segments = FEATURE_SPLIT.split(&raw);
    let mut artists = Vec::new();
    if let Some(main) = segments.next() {
        collect_names(main, ArtistRole::Main, &mut artists);
    }
    for feature in segments {
        collect_names(feature, ArtistRole::Feature, &mut artists);
    }
    artists
}

fn collect_names(segment: &str, role: ArtistRole, out: &mut Vec<Artist>) {
    for name in ARTIST_SEPARATOR.split(segment) {
        let name = collapse_whitespace(name);
        if !name.is_empty() {
            out.push(Artist::new(name, role));
        }
    }
}

/// Strip leading zeros from a track number, collapsing to "0" when
/// nothing remains.
pub fn track_number(raw: &str) -> String {
    let trimmed = collapse_whitespace(raw);
    let stripped = trimmed.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Build a search display line: artist names joined with ", ", a dash,
/// the release title. Without artists the title stands alone.
pub fn display_name(artists: &[String], title: &str) -> String {
    if artists.is_empty() {
        title.to_string()
    } else if title.is_empty() {
        artists.join(", ")
    } else {
        format!("{} \u{2013} {}", artists.join(", "), title)
    }
}
