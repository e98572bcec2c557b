//! The contract between the extraction core and per-site source adapters.
//!
//! An adapter owns everything site-specific: the transport request, the
//! parsed-document state, and the knowledge of where each field lives on a
//! page. The orchestrators in [`crate::extract`] drive these hooks in a
//! fixed order and never touch a site's parsing technology directly.
//!
//! Getters return `None` or an empty list as the absence sentinel; they
//! return an error only when a located container yields no valid value, or
//! when the source models a field as mandatory and it is missing. Disc,
//! track and search-hit containers are opaque to the core: each adapter
//! picks its own handle types.

use async_trait::async_trait;

use crate::config;
use crate::error::Result;
use crate::model::Artist;
use crate::normalize;

pub mod audiojelly;
pub mod beatport;

/// An artist credit as reported by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistCredit {
    /// Raw display text, still to be split by the normalizer.
    Text(String),
    /// An already-typed credit from a structured source; bypasses the
    /// normalizer.
    Structured(Artist),
}

/// Resolve adapter-reported credits into canonical artists.
pub(crate) fn resolve_credits(credits: Vec<ArtistCredit>) -> Vec<Artist> {
    let mut artists = Vec::new();
    for credit in credits {
        match credit {
            ArtistCredit::Text(raw) => artists.extend(normalize::split_artist_credits(&raw)),
            ArtistCredit::Structured(artist) => artists.push(artist),
        }
    }
    artists
}

/// Build the HTTP client the bundled source adapters share.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(config::USER_AGENT)
        .build()
        .expect("failed to build HTTP client")
}

/// Extraction hooks for one release page, bound to a specific release.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Opaque per-disc handle produced by [`Self::disc_containers`].
    type DiscHandle: Send;
    /// Opaque per-track handle produced by [`Self::track_containers`].
    type TrackHandle: Send;

    /// Display identity for diagnostics, e.g. `beatport release 851318`.
    fn identity(&self) -> String;

    /// Canonical URL of the release, defaulting to the URL the adapter was
    /// constructed from.
    fn source_url(&self) -> Option<String> {
        None
    }

    /// Issue the one transport request and return the raw response body.
    ///
    /// The orchestrator calls this exactly once per extraction; timeouts,
    /// retries and backoff are the transport's own business.
    async fn fetch(&self) -> Result<String>;

    /// Source-specific parsing setup, called once with the fetched body
    /// before any getter.
    fn prepare(&mut self, raw: &str) -> Result<()>;

    fn release_date(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn format(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn labels(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn catalog_numbers(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn title(&self) -> Result<Option<String>>;

    fn artists(&self) -> Result<Vec<ArtistCredit>> {
        Ok(Vec::new())
    }

    fn genres(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn styles(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn country(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Disc handles keyed by 1-based disc index, in the order the source
    /// reports them.
    fn disc_containers(&self) -> Result<Vec<(u32, Self::DiscHandle)>>;

    fn disc_title(&self, _disc: &Self::DiscHandle) -> Result<Option<String>> {
        Ok(None)
    }

    /// Track handles of one disc, in running order.
    fn track_containers(&self, disc: &Self::DiscHandle) -> Result<Vec<Self::TrackHandle>>;

    fn track_number(&self, track: &Self::TrackHandle) -> Result<Option<String>>;

    fn track_artists(&self, _track: &Self::TrackHandle) -> Result<Vec<ArtistCredit>> {
        Ok(Vec::new())
    }

    fn track_title(&self, track: &Self::TrackHandle) -> Result<Option<String>>;

    fn track_length(&self, _track: &Self::TrackHandle) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Extraction hooks for one search, bound to a specific search term.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Opaque per-hit handle produced by [`Self::result_containers`].
    type Hit: Send;
    /// The release adapter type constructed from a hit.
    type Release: ReleaseSource;

    /// Display identity for diagnostics, e.g. `beatport search "rework"`.
    fn identity(&self) -> String;

    /// Issue the one transport request and return the raw response body.
    ///
    /// A source whose "nothing found" answer is a transport error reports
    /// it as [`crate::ExtractError::NotFound`]; the search orchestrator
    /// turns exactly that into an empty result list.
    async fn fetch(&self) -> Result<String>;

    /// Source-specific parsing setup, called once with the fetched body
    /// before any getter.
    fn prepare(&mut self, raw: &str) -> Result<()>;

    /// Ordered result containers, already capped by the source.
    fn result_containers(&self) -> Result<Vec<Self::Hit>>;

    fn result_name(&self, hit: &Self::Hit) -> Result<String>;

    fn result_info(&self, _hit: &Self::Hit) -> Result<Option<String>> {
        Ok(None)
    }

    /// The release adapter for a hit, or `None` when the hit does not
    /// resolve to an accessible release (the hit is then dropped).
    fn result_release(&self, hit: &Self::Hit) -> Result<Option<Self::Release>>;
}
