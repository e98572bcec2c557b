//! Release extraction: drives a [`ReleaseSource`] end-to-end into the
//! canonical [`Release`].
//!
//! The pipeline is the same for every source: one fetch, one prepare,
//! then the field getters in a fixed order, then discs and tracks in the
//! exact order the adapter reports them. Fields the adapter reports as
//! absent are omitted from the assembled release; only the title (and
//! whatever the source itself models as mandatory) can fail the run.

use std::collections::BTreeMap;

use crate::error::{ExtractError, Result};
use crate::model::{Disc, Release, Track};
use crate::normalize;
use crate::source::{ReleaseSource, resolve_credits};

/// One release extraction run.
///
/// Owns its source adapter and memoizes the assembled release: repeated
/// [`extract`](Self::extract) calls return the same object and trigger no
/// second fetch.
pub struct ReleaseExtractor<S: ReleaseSource> {
    source: S,
    release: Option<Release>,
}

impl<S: ReleaseSource> ReleaseExtractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            release: None,
        }
    }

    /// The adapter this extraction is bound to.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Extract the canonical release, or return the memoized result.
    pub async fn extract(&mut self) -> Result<&Release> {
        if self.release.is_none() {
            let release = assemble(&mut self.source).await?;
            self.release = Some(release);
        }
        Ok(self.release.as_ref().expect("release memoized above"))
    }
}

/// Run the fixed extraction pipeline against one source.
async fn assemble<S: ReleaseSource>(source: &mut S) -> Result<Release> {
    tracing::debug!(release = %source.identity(), "extracting release");

    let raw = source.fetch().await?;
    source.prepare(&raw)?;

    let release_date = source.release_date()?;
    let format = source.format()?;
    let labels = source.labels()?;
    let catalog_numbers = source.catalog_numbers()?;
    let title = source
        .title()?
        .ok_or_else(|| ExtractError::missing_field("title", source.identity()))?;
    let artists = resolve_credits(source.artists()?);
    let genres = source.genres()?;
    let styles = source.styles()?;
    let country = source.country()?;
    let source_url = source.source_url();

    let mut discs = BTreeMap::new();
    for (index, disc) in source.disc_containers()? {
        let title = source.disc_title(&disc)?;
        let mut tracks = Vec::new();
        for track in source.track_containers(&disc)? {
            tracks.push(assemble_track(source, &track)?);
        }
        discs.insert(index, Disc { title, tracks });
    }

    Ok(Release {
        title,
        release_date,
        format,
        labels,
        catalog_numbers,
        artists,
        genres,
        styles,
        country,
        source_url,
        discs,
    })
}

fn assemble_track<S: ReleaseSource>(source: &S, track: &S::TrackHandle) -> Result<Track> {
    let number = source
        .track_number(track)?
        .ok_or_else(|| ExtractError::missing_field("track number", source.identity()))?;
    let artists = resolve_credits(source.track_artists(track)?);
    let title = source
        .track_title(track)?
        .ok_or_else(|| ExtractError::missing_field("track title", source.identity()))?;
    let length = source.track_length(track)?;

    Ok(Track {
        number: normalize::track_number(&number),
        artists,
        title,
        length,
    })
}
