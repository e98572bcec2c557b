//! Canonical release schema.
//!
//! The normalized shapes every source's output is assembled into,
//! independent of where the data came from. Serialization follows the
//! "only report what was found" contract: absent optionals and empty
//! lists are omitted from the output entirely, never emitted as `null`
//! or `[]`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config;

/// How an artist is credited on a release or track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtistRole {
    /// Primary credited artist.
    Main,
    /// Guest/featured artist.
    Feature,
    /// Credited for a remix variant only.
    Remixer,
}

/// A single credited artist.
///
/// Names are non-empty and whitespace-normalized; the role is assigned by
/// the normalizer or by a structured source, never inferred after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub name: String,
    pub role: ArtistRole,
}

impl Artist {
    pub fn new(name: impl Into<String>, role: ArtistRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// The synthetic marker used when a release's artist field denotes a
    /// compilation rather than a specific performer.
    pub fn various() -> Self {
        Self::new(config::VARIOUS_ARTIST_NAME, ArtistRole::Main)
    }
}

/// One track of a disc, in the source's running order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Decimal track number with leading zeros stripped.
    pub number: String,
    /// Track-level credits; empty when the release credits already cover
    /// the track.
    pub artists: Vec<Artist>,
    pub title: String,
    /// Source-defined length text ("mm:ss", raw seconds, ...), passed
    /// through unparsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
}

/// One disc of a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Disc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub tracks: Vec<Track>,
}

/// A published release assembled from one source.
///
/// Only `title` is always present; every other field appears exactly when
/// the source reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub catalog_numbers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<Artist>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Discs keyed by 1-based disc index.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub discs: BTreeMap<u32, Disc>,
}

/// One hit of a source's search results: a display line plus the release
/// adapter it resolves to.
///
/// Hits that do not resolve to an accessible release are never
/// constructed; the search orchestrator drops them instead.
#[derive(Debug)]
pub struct SearchResult<R> {
    pub name: String,
    pub info: Option<String>,
    pub release: R,
}
