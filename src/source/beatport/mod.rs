//! Beatport source: the JSON catalog API.
//!
//! Release metadata comes from the catalog detail endpoint, searches from
//! the catalog search endpoint. Both answer structured JSON, so artist
//! credits are reported already typed and bypass the text normalizer; the
//! API models every release as one flat track list, mapped to a single
//! disc here.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::config;
use crate::error::{ExtractError, Result};
use crate::model::{Artist, ArtistRole};
use crate::normalize;
use crate::source::{ArtistCredit, ReleaseSource, SearchSource, http_client};

pub mod dto;

const DETAIL_URL: &str = "http://api.beatport.com/catalog/releases/detail";
const SEARCH_URL: &str = "http://api.beatport.com/catalog/search";
const SITE_URL: &str = "http://www.beatport.com";

/// Release page URLs look like `/release/<slug>/<id>`.
static RELEASE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?beatport\.com/release/(.*?)/(\d+)$").unwrap()
});

/// Release adapter bound to one Beatport release id.
pub struct Release {
    id: u64,
    slug: String,
    url: Option<String>,
    client: reqwest::Client,
    detail: Option<dto::ReleaseDetail>,
}

/// Track array entry plus its 1-based position.
#[derive(Debug, Clone)]
pub struct TrackContainer {
    number: u32,
    track: dto::TrackDetail,
}

impl Release {
    pub fn new(id: u64, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            url: None,
            client: http_client(),
            detail: None,
        }
    }

    /// Construct the adapter from a release page URL, or `None` when the
    /// URL does not match the Beatport release pattern.
    pub fn from_url(url: &str) -> Option<Self> {
        let captures = RELEASE_URL.captures(url)?;
        let id = captures.get(2)?.as_str().parse().ok()?;
        let slug = captures.get(1).map_or("", |m| m.as_str());
        let mut release = Self::new(id, slug);
        release.url = Some(url.to_string());
        Some(release)
    }

    fn detail(&self) -> Result<&dto::ReleaseDetail> {
        self.detail
            .as_ref()
            .ok_or_else(|| ExtractError::malformed("release accessed before prepare", self.identity()))
    }

    /// Main release credits, shared by the artists getter and the
    /// track-level redundancy check.
    fn main_artists(&self, detail: &dto::ReleaseDetail) -> Vec<Artist> {
        let real: Vec<Artist> = detail
            .artists
            .iter()
            .filter(|credit| credit.kind.eq_ignore_ascii_case("artist") && !credit.name.is_empty())
            .map(|credit| Artist::new(credit.name.clone(), ArtistRole::Main))
            .collect();

        // an album credited to several artists is a compilation
        if detail.category.as_deref() == Some("Album") && real.len() > 1 {
            vec![Artist::various()]
        } else {
            real
        }
    }
}

#[async_trait]
impl ReleaseSource for Release {
    type DiscHandle = ();
    type TrackHandle = TrackContainer;

    fn identity(&self) -> String {
        format!("beatport release {}", self.id)
    }

    fn source_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        Some(format!("{SITE_URL}/release/{}/{}", self.slug, self.id))
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(DETAIL_URL)
            .query(&[
                ("format", "json"),
                ("v", "1.0"),
                ("id", self.id.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(|err| ExtractError::transport(err.to_string(), self.identity()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::transport(
                format!("HTTP {}", status.as_u16()),
                self.identity(),
            ));
        }

        response
            .text()
            .await
            .map_err(|err| ExtractError::transport(err.to_string(), self.identity()))
    }

    fn prepare(&mut self, raw: &str) -> Result<()> {
        let envelope: dto::DetailResponse = serde_json::from_str(raw)
            .map_err(|_| ExtractError::malformed("invalid server response", self.identity()))?;
        if envelope.metadata.count != 1 {
            return Err(ExtractError::malformed(
                "did not get exactly one release for the given id",
                self.identity(),
            ));
        }
        let detail: dto::ReleaseDetail = serde_json::from_value(envelope.results)
            .map_err(|_| ExtractError::malformed("invalid server response", self.identity()))?;
        self.detail = Some(detail);
        Ok(())
    }

    fn release_date(&self) -> Result<Option<String>> {
        Ok(self.detail()?.release_date.clone())
    }

    fn format(&self) -> Result<Option<String>> {
        // "Release" and "Uncategorized" carry no format information
        Ok(self
            .detail()?
            .category
            .clone()
            .filter(|category| category != "Release" && category != "Uncategorized"))
    }

    fn labels(&self) -> Result<Vec<String>> {
        Ok(self
            .detail()?
            .label
            .as_ref()
            .map(|label| vec![label.name.clone()])
            .unwrap_or_default())
    }

    fn catalog_numbers(&self) -> Result<Vec<String>> {
        Ok(self
            .detail()?
            .catalog_number
            .clone()
            .map(|number| vec![number])
            .unwrap_or_default())
    }

    fn title(&self) -> Result<Option<String>> {
        Ok(self.detail()?.name.clone())
    }

    fn artists(&self) -> Result<Vec<ArtistCredit>> {
        let detail = self.detail()?;
        Ok(self
            .main_artists(detail)
            .into_iter()
            .map(ArtistCredit::Structured)
            .collect())
    }

    fn genres(&self) -> Result<Vec<String>> {
        Ok(self
            .detail()?
            .genres
            .iter()
            .map(|genre| genre.name.clone())
            .collect())
    }

    fn disc_containers(&self) -> Result<Vec<(u32, ())>> {
        // the API models a release as one flat track list
        Ok(vec![(1, ())])
    }

    fn track_containers(&self, _disc: &()) -> Result<Vec<TrackContainer>> {
        Ok(self
            .detail()?
            .tracks
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, track)| TrackContainer {
                number: index as u32 + 1,
                track,
            })
            .collect())
    }

    fn track_number(&self, track: &TrackContainer) -> Result<Option<String>> {
        Ok(Some(track.number.to_string()))
    }

    fn track_artists(&self, track: &TrackContainer) -> Result<Vec<ArtistCredit>> {
        let detail = self.detail()?;
        let mut main = Vec::new();
        let mut remixers = Vec::new();
        for credit in &track.track.artists {
            if credit.name.is_empty() {
                continue;
            }
            if credit.kind.eq_ignore_ascii_case("artist") {
                main.push(Artist::new(credit.name.clone(), ArtistRole::Main));
            } else if credit.kind.eq_ignore_ascii_case("remixer") {
                remixers.push(Artist::new(credit.name.clone(), ArtistRole::Remixer));
            }
        }

        // the release-level credits already cover the main artists
        if main == self.main_artists(detail) {
            main.clear();
        }
        main.extend(remixers);
        Ok(main.into_iter().map(ArtistCredit::Structured).collect())
    }

    fn track_title(&self, track: &TrackContainer) -> Result<Option<String>> {
        let Some(name) = &track.track.name else {
            return Ok(None);
        };
        let mut title = name.clone();
        if let Some(mix) = &track.track.mix_name
            && mix != "Original Mix"
        {
            title.push_str(" [");
            title.push_str(&normalize::collapse_whitespace(mix));
            title.push(']');
        }
        Ok(Some(title))
    }

    fn track_length(&self, track: &TrackContainer) -> Result<Option<String>> {
        Ok(track.track.length.clone())
    }
}

/// Search adapter bound to one search term.
pub struct Search {
    term: String,
    client: reqwest::Client,
    response: Option<dto::SearchResponse>,
}

impl Search {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            client: http_client(),
            response: None,
        }
    }
}

#[async_trait]
impl SearchSource for Search {
    type Hit = dto::SearchRelease;
    type Release = Release;

    fn identity(&self) -> String {
        format!("beatport search {:?}", self.term)
    }

    async fn fetch(&self) -> Result<String> {
        let per_page = config::SEARCH_RESULT_CAP.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("v", "2.0"),
                ("format", "json"),
                ("perPage", per_page.as_str()),
                ("page", "1"),
                ("facets", "fieldType:release"),
                ("highlight", "false"),
                ("query", self.term.as_str()),
            ])
            .send()
            .await
            .map_err(|err| ExtractError::transport(err.to_string(), self.identity()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::transport(
                format!("HTTP {}", status.as_u16()),
                self.identity(),
            ));
        }

        response
            .text()
            .await
            .map_err(|err| ExtractError::transport(err.to_string(), self.identity()))
    }

    fn prepare(&mut self, raw: &str) -> Result<()> {
        let response: dto::SearchResponse = serde_json::from_str(raw)
            .map_err(|_| ExtractError::malformed("invalid server response", self.identity()))?;
        self.response = Some(response);
        Ok(())
    }

    fn result_containers(&self) -> Result<Vec<dto::SearchRelease>> {
        let response = self
            .response
            .as_ref()
            .ok_or_else(|| ExtractError::malformed("search accessed before prepare", self.identity()))?;
        // only entries carrying an id can ever resolve to a release
        Ok(response
            .results
            .iter()
            .filter(|hit| hit.id.is_some())
            .cloned()
            .collect())
    }

    fn result_name(&self, hit: &dto::SearchRelease) -> Result<String> {
        let real: Vec<String> = hit
            .artists
            .iter()
            .filter(|credit| credit.kind.eq_ignore_ascii_case("artist") && !credit.name.is_empty())
            .map(|credit| credit.name.clone())
            .collect();
        let artists = if hit.category.as_deref() == Some("Album") && real.len() > 1 {
            vec![config::VARIOUS_ARTIST_NAME.to_string()]
        } else {
            real
        };
        Ok(normalize::display_name(
            &artists,
            hit.name.as_deref().unwrap_or_default(),
        ))
    }

    fn result_info(&self, hit: &dto::SearchRelease) -> Result<Option<String>> {
        let mut parts = Vec::new();
        if let Some(date) = &hit.release_date {
            parts.push(date.clone());
        }
        if let Some(label) = &hit.label {
            parts.push(label.name.clone());
        }
        if let Some(number) = &hit.catalog_number {
            parts.push(number.clone());
        }
        Ok((!parts.is_empty()).then(|| parts.join(" | ")))
    }

    fn result_release(&self, hit: &dto::SearchRelease) -> Result<Option<Release>> {
        Ok(hit
            .id
            .map(|id| Release::new(id, hit.slug.clone().unwrap_or_default())))
    }
}
