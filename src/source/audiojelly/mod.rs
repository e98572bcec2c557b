//! Audiojelly source: HTML release and search pages.
//!
//! Field location is CSS-selector driven. Release pages carry a spec
//! table of `<label>`/`<span class="spec">` pairs; the track list is a
//! single `div.trackList.release` of `div.trackListRow` entries. Artist
//! credits are free text and reported raw for the normalizer to split.
//!
//! The parsed page never outlives `prepare`: every container handed to
//! the core is the owned HTML of the matched element, re-parsed as a
//! fragment by the getter that consumes it. That keeps the adapter
//! `Send` without holding the document tree.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config;
use crate::error::{ExtractError, Result};
use crate::normalize;
use crate::source::{ArtistCredit, ReleaseSource, SearchSource, http_client};

const SITE_URL: &str = "http://www.audiojelly.com";

/// Release page URLs look like `/releases/<slug>/<id>`.
static RELEASE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?audiojelly\.com/releases/(.*?)/(\d+)$").unwrap()
});

/// Genre anchors may pack several genres into one text.
static GENRE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[/,]\s*").unwrap());

fn sel(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Collapsed text content of an HTML fragment.
fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    normalize::collapse_whitespace(&fragment.root_element().text().collect::<String>())
}

/// Owned HTML of every element matching `css` inside the fragment.
fn select_fragments(html: &str, css: &'static str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&sel(css))
        .map(|element| element.html())
        .collect()
}

/// Collapsed, non-empty anchor texts inside the fragment.
fn anchor_texts(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&sel("a"))
        .map(|anchor| normalize::collapse_whitespace(&anchor.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Release adapter bound to one Audiojelly release page.
pub struct Release {
    id: u64,
    slug: String,
    url: Option<String>,
    client: reqwest::Client,
    /// Spec spans keyed by their lowercased label text.
    specs: HashMap<String, String>,
    headings: Vec<String>,
    tracklists: Vec<String>,
    /// Whether every track's artist line merely repeats the release
    /// artist; redundant track credits are then not reported at all.
    track_artists_match_release: bool,
}

impl Release {
    pub fn new(id: u64, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            url: None,
            client: http_client(),
            specs: HashMap::new(),
            headings: Vec::new(),
            tracklists: Vec::new(),
            track_artists_match_release: true,
        }
    }

    /// Construct the adapter from a release page URL, or `None` when the
    /// URL does not match the Audiojelly release pattern.
    pub fn from_url(url: &str) -> Option<Self> {
        let captures = RELEASE_URL.captures(url)?;
        let id = captures.get(2)?.as_str().parse().ok()?;
        let slug = captures.get(1).map_or("", |m| m.as_str());
        let mut release = Self::new(id, slug);
        release.url = Some(url.to_string());
        Some(release)
    }

    fn page_url(&self) -> String {
        format!("{SITE_URL}/releases/{}/{}", self.slug, self.id)
    }
}

#[async_trait]
impl ReleaseSource for Release {
    type DiscHandle = String;
    type TrackHandle = String;

    fn identity(&self) -> String {
        format!("audiojelly release {}", self.id)
    }

    fn source_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        Some(self.page_url())
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(self.page_url())
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
        let doc = Html::parse_document(raw);

        let mut specs = HashMap::new();
        for span in doc.select(&sel("label + span.spec")) {
            let Some(label) = span.prev_siblings().filter_map(ElementRef::wrap).next() else {
                continue;
            };
            let key = normalize::collapse_whitespace(&label.text().collect::<String>())
                .to_lowercase();
            specs.insert(key, span.html());
        }

        // does every track's artist line repeat the release artist?
        let mut redundant = true;
        if let Some(artist_html) = specs.get("artist") {
            let release_artist = fragment_text(artist_html);
            for span in doc.select(&sel("span.artistName")) {
                let track_artist =
                    normalize::collapse_whitespace(&span.text().collect::<String>());
                redundant = track_artist == release_artist;
                if !redundant {
                    break;
                }
            }
        }

        self.specs = specs;
        self.headings = doc
            .select(&sel("div.pageHeader h1"))
            .map(|element| element.html())
            .collect();
        self.tracklists = doc
            .select(&sel("div.trackList.release"))
            .map(|element| element.html())
            .collect();
        self.track_artists_match_release = redundant;
        Ok(())
    }

    fn release_date(&self) -> Result<Option<String>> {
        Ok(self
            .specs
            .get("release date")
            .map(|html| fragment_text(html))
            .filter(|date| !date.is_empty()))
    }

    fn labels(&self) -> Result<Vec<String>> {
        Ok(self
            .specs
            .get("label")
            .map(|html| anchor_texts(html))
            .unwrap_or_default())
    }

    fn catalog_numbers(&self) -> Result<Vec<String>> {
        let Some(html) = self.specs.get("cat number") else {
            return Ok(Vec::new());
        };
        let number = fragment_text(html);
        Ok(if number.is_empty() {
            Vec::new()
        } else {
            vec![number]
        })
    }

    fn title(&self) -> Result<Option<String>> {
        if self.headings.len() != 1 {
            return Err(ExtractError::malformed(
                "could not determine title heading",
                self.identity(),
            ));
        }
        let title = fragment_text(&self.headings[0]);
        Ok((!title.is_empty()).then_some(title))
    }

    fn artists(&self) -> Result<Vec<ArtistCredit>> {
        let Some(html) = self.specs.get("artist") else {
            return Err(ExtractError::missing_field("artist", self.identity()));
        };
        Ok(anchor_texts(html)
            .into_iter()
            .map(ArtistCredit::Text)
            .collect())
    }

    fn genres(&self) -> Result<Vec<String>> {
        let Some(html) = self.specs.get("genre") else {
            return Ok(Vec::new());
        };
        let mut genres = Vec::new();
        for text in anchor_texts(html) {
            for genre in GENRE_SPLIT.split(&text) {
                if !genre.is_empty() {
                    genres.push(genre.to_string());
                }
            }
        }
        Ok(genres)
    }

    fn disc_containers(&self) -> Result<Vec<(u32, String)>> {
        if self.tracklists.len() != 1 {
            return Err(ExtractError::malformed(
                "could not locate the release track list",
                self.identity(),
            ));
        }
        Ok(vec![(1, self.tracklists[0].clone())])
    }

    fn track_containers(&self, disc: &String) -> Result<Vec<String>> {
        Ok(select_fragments(disc, "div.trackListRow"))
    }

    fn track_number(&self, track: &String) -> Result<Option<String>> {
        let numbers = select_fragments(track, "p.trackNum");
        if numbers.len() == 1 {
            let number = fragment_text(&numbers[0]);
            if !number.is_empty() {
                return Ok(Some(number));
            }
        }
        Err(ExtractError::malformed(
            "could not extract track number",
            self.identity(),
        ))
    }

    fn track_artists(&self, track: &String) -> Result<Vec<ArtistCredit>> {
        if self.track_artists_match_release {
            return Ok(Vec::new());
        }
        let spans = select_fragments(track, "span.artistName");
        if spans.len() != 1 {
            return Ok(Vec::new());
        }
        Ok(anchor_texts(&spans[0])
            .into_iter()
            // a track never carries the compilation marker itself
            .filter(|text| !config::VARIOUS_ARTIST_ALIASES.contains(&text.as_str()))
            .map(ArtistCredit::Text)
            .collect())
    }

    fn track_title(&self, track: &String) -> Result<Option<String>> {
        let titles = select_fragments(track, "span.trackName");
        if titles.len() == 1 {
            let title = fragment_text(&titles[0]);
            if !title.is_empty() {
                return Ok(Some(title));
            }
        }
        Err(ExtractError::malformed(
            "could not extract track title",
            self.identity(),
        ))
    }

    fn track_length(&self, track: &String) -> Result<Option<String>> {
        let lengths = select_fragments(track, "span.trackTime");
        if lengths.len() != 1 {
            return Ok(None);
        }
        let length = fragment_text(&lengths[0]);
        Ok((!length.is_empty()).then_some(length))
    }
}

/// Search adapter bound to one search term.
pub struct Search {
    term: String,
    client: reqwest::Client,
    hits: Vec<String>,
}

impl Search {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            client: http_client(),
            hits: Vec::new(),
        }
    }
}

#[async_trait]
impl SearchSource for Search {
    type Hit = String;
    type Release = Release;

    fn identity(&self) -> String {
        format!("audiojelly search {:?}", self.term)
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{SITE_URL}/search/all/"))
            .query(&[("view", "releases"), ("q", self.term.as_str())])
            .send()
            .await
            .map_err(|err| ExtractError::transport(err.to_string(), self.identity()))?;

        let status = response.status();
        // the site answers 500 when no release matches the term
        if status.as_u16() == 500 {
            return Err(ExtractError::not_found(self.identity()));
        }
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
        let doc = Html::parse_document(raw);
        self.hits = doc
            .select(&sel("div.relInfo"))
            .take(config::SEARCH_RESULT_CAP)
            .map(|element| element.html())
            .collect();
        Ok(())
    }

    fn result_containers(&self) -> Result<Vec<String>> {
        Ok(self.hits.clone())
    }

    fn result_name(&self, hit: &String) -> Result<String> {
        let fragment = Html::parse_fragment(hit);
        let artist_anchors: Vec<_> = fragment.select(&sel("div.relArtistName a")).collect();
        if artist_anchors.is_empty() {
            return Err(ExtractError::malformed(
                "could not extract release artist",
                self.identity(),
            ));
        }
        let artists: Vec<String> = artist_anchors
            .iter()
            .map(|anchor| normalize::collapse_whitespace(&anchor.text().collect::<String>()))
            .filter(|text| !text.is_empty())
            .collect();

        let title_anchors: Vec<_> = fragment.select(&sel("div.relReleaseName a")).collect();
        if title_anchors.len() != 1 {
            return Err(ExtractError::malformed(
                "could not extract release name",
                self.identity(),
            ));
        }
        let title =
            normalize::collapse_whitespace(&title_anchors[0].text().collect::<String>());

        Ok(normalize::display_name(&artists, &title))
    }

    fn result_info(&self, hit: &String) -> Result<Option<String>> {
        let mut parts = Vec::new();
        for css in ["div.relLabel", "div.relGenre"] {
            let divs = select_fragments(hit, css);
            if divs.len() == 1 {
                let text = fragment_text(&divs[0]);
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        }
        Ok((!parts.is_empty()).then(|| parts.join(" | ")))
    }

    fn result_release(&self, hit: &String) -> Result<Option<Release>> {
        let fragment = Html::parse_fragment(hit);
        let anchors: Vec<_> = fragment.select(&sel("div.relReleaseName a")).collect();
        if anchors.len() != 1 {
            return Err(ExtractError::malformed(
                "could not extract release name",
                self.identity(),
            ));
        }
        let Some(href) = anchors[0].value().attr("href") else {
            return Ok(None);
        };
        Ok(Release::from_url(&format!("{SITE_URL}{href}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_FIXTURE: &str = r#"<html><body>
        <div class="pageHeader"><h1>Plus  Various I</h1></div>
        <div class="releaseSpecs">
            <label>Artist</label><span class="spec"><a href="/artists/1">Various Artists</a></span>
            <label>Release Date</label><span class="spec">2012-04-01</span>
            <label>Label</label><span class="spec"><a href="/labels/9">Sound Academy Plus</a></span>
            <label>Cat Number</label><span class="spec">SAP042</span>
            <label>Genre</label><span class="spec"><a href="/genres/7">Tech House / Deep House</a></span>
        </div>
        <div class="trackList release">
            <div class="trackListRow">
                <p class="trackNum">01</p>
                <span class="artistName"><a href="/a/2">Can Yuksel</a></span>
                <span class="trackName">With You Forever (Original Mix)</span>
                <span class="trackTime">07:08</span>
            </div>
            <div class="trackListRow">
                <p class="trackNum">02</p>
                <span class="artistName"><a href="/a/3">Ismael Casimiro</a> &amp; <a href="/a/4">Borja Maneje</a></span>
                <span class="trackName">Electro Deep (Gokhan Guneyli Remix)</span>
                <span class="trackTime">08:48</span>
            </div>
        </div>
    </body></html>"#;

    fn prepared_release() -> Release {
        let mut release = Release::new(230282, "plus-various-i");
        release.prepare(RELEASE_FIXTURE).expect("fixture prepares");
        release
    }

    #[test]
    fn test_from_url_extracts_slug_and_id() {
        let release =
            Release::from_url("http://www.audiojelly.com/releases/plus-various-i/230282")
                .expect("url matches");
        assert_eq!(release.id, 230282);
        assert_eq!(release.slug, "plus-various-i");
        assert_eq!(
            release.source_url().as_deref(),
            Some("http://www.audiojelly.com/releases/plus-various-i/230282")
        );
    }

    #[test]
    fn test_from_url_rejects_foreign_urls() {
        assert!(Release::from_url("http://www.beatport.com/release/foo/1").is_none());
        assert!(Release::from_url("http://www.audiojelly.com/artists/foo/1").is_none());
    }

    #[test]
    fn test_title_is_collapsed_heading_text() {
        let release = prepared_release();
        assert_eq!(release.title().unwrap().as_deref(), Some("Plus Various I"));
    }

    #[test]
    fn test_title_requires_exactly_one_heading() {
        let mut release = Release::new(1, "x");
        release
            .prepare("<html><body><p>no heading here</p></body></html>")
            .expect("fixture prepares");
        assert!(matches!(
            release.title(),
            Err(ExtractError::Malformed { .. })
        ));
    }

    #[test]
    fn test_spec_fields_are_located_by_label() {
        let release = prepared_release();
        assert_eq!(release.release_date().unwrap().as_deref(), Some("2012-04-01"));
        assert_eq!(release.labels().unwrap(), vec!["Sound Academy Plus"]);
        assert_eq!(release.catalog_numbers().unwrap(), vec!["SAP042"]);
    }

    #[test]
    fn test_genres_split_packed_anchor_text() {
        let release = prepared_release();
        assert_eq!(release.genres().unwrap(), vec!["Tech House", "Deep House"]);
    }

    #[test]
    fn test_release_artists_are_raw_text_credits() {
        let release = prepared_release();
        assert_eq!(
            release.artists().unwrap(),
            vec![ArtistCredit::Text("Various Artists".to_string())]
        );
    }

    #[test]
    fn test_missing_artist_span_is_required_field_error() {
        let mut release = Release::new(2, "x");
        release
            .prepare("<html><body><div class=\"pageHeader\"><h1>T</h1></div></body></html>")
            .expect("fixture prepares");
        assert_eq!(
            release.artists().unwrap_err(),
            ExtractError::missing_field("artist", "audiojelly release 2")
        );
    }

    #[test]
    fn test_single_disc_with_ordered_tracks() {
        let release = prepared_release();
        let discs = release.disc_containers().expect("one tracklist");
        assert_eq!(discs.len(), 1);
        assert_eq!(discs[0].0, 1);

        let tracks = release.track_containers(&discs[0].1).expect("rows listed");
        assert_eq!(tracks.len(), 2);
        assert_eq!(release.track_number(&tracks[0]).unwrap().as_deref(), Some("01"));
        assert_eq!(
            release.track_title(&tracks[0]).unwrap().as_deref(),
            Some("With You Forever (Original Mix)")
        );
        assert_eq!(release.track_length(&tracks[0]).unwrap().as_deref(), Some("07:08"));
    }

    #[test]
    fn test_missing_tracklist_is_malformed() {
        let mut release = Release::new(3, "x");
        release
            .prepare("<html><body><div class=\"pageHeader\"><h1>T</h1></div></body></html>")
            .expect("fixture prepares");
        assert!(matches!(
            release.disc_containers(),
            Err(ExtractError::Malformed { .. })
        ));
    }

    #[test]
    fn test_track_artists_reported_when_differing_from_release() {
        let release = prepared_release();
        let discs = release.disc_containers().expect("one tracklist");
        let tracks = release.track_containers(&discs[0].1).expect("rows listed");
        assert_eq!(
            release.track_artists(&tracks[0]).unwrap(),
            vec![ArtistCredit::Text("Can Yuksel".to_string())]
        );
        assert_eq!(
            release.track_artists(&tracks[1]).unwrap(),
            vec![
                ArtistCredit::Text("Ismael Casimiro".to_string()),
                ArtistCredit::Text("Borja Maneje".to_string()),
            ]
        );
    }

    #[test]
    fn test_redundant_track_artists_are_suppressed() {
        let fixture = r#"<html><body>
            <div class="pageHeader"><h1>Love Infinity</h1></div>
            <label>Artist</label><span class="spec"><a>AudioFreQ</a></span>
            <div class="trackList release">
                <div class="trackListRow">
                    <p class="trackNum">1</p>
                    <span class="artistName"><a>AudioFreQ</a></span>
                    <span class="trackName">Love Infinity (Radio Edit)</span>
                </div>
            </div>
        </body></html>"#;

        let mut release = Release::new(211079, "love-infinity");
        release.prepare(fixture).expect("fixture prepares");

        let discs = release.disc_containers().expect("one tracklist");
        let tracks = release.track_containers(&discs[0].1).expect("rows listed");
        assert!(release.track_artists(&tracks[0]).unwrap().is_empty());
    }

    const SEARCH_FIXTURE: &str = r#"<html><body>
        <div class="relInfo">
            <div class="relArtistName"><a href="/a/2">Can Yuksel</a></div>
            <div class="relReleaseName"><a href="/releases/with-you-forever/230001">With You Forever</a></div>
            <div class="relLabel">Sound Academy Plus</div>
            <div class="relGenre">Tech House</div>
        </div>
        <div class="relInfo">
            <div class="relArtistName"><a href="/a/5">Serdar Ors</a></div>
            <div class="relReleaseName"><a href="/news/not-a-release">Musica</a></div>
        </div>
    </body></html>"#;

    fn prepared_search() -> Search {
        let mut search = Search::new("forever");
        search.prepare(SEARCH_FIXTURE).expect("fixture prepares");
        search
    }

    #[test]
    fn test_search_names_join_artists_and_title() {
        let search = prepared_search();
        let hits = search.result_containers().expect("hits listed");
        assert_eq!(hits.len(), 2);
        assert_eq!(
            search.result_name(&hits[0]).unwrap(),
            "Can Yuksel \u{2013} With You Forever"
        );
    }

    #[test]
    fn test_search_info_joins_label_and_genre() {
        let search = prepared_search();
        let hits = search.result_containers().expect("hits listed");
        assert_eq!(
            search.result_info(&hits[0]).unwrap().as_deref(),
            Some("Sound Academy Plus | Tech House")
        );
        assert_eq!(search.result_info(&hits[1]).unwrap(), None);
    }

    #[test]
    fn test_search_release_resolves_via_url_pattern() {
        let search = prepared_search();
        let hits = search.result_containers().expect("hits listed");

        let release = search
            .result_release(&hits[0])
            .expect("release constructs")
            .expect("link matches the release pattern");
        assert_eq!(release.id, 230001);

        // a link outside the release pattern leaves the hit unresolvable
        assert!(search.result_release(&hits[1]).expect("no error").is_none());
    }

    #[test]
    fn test_search_caps_result_containers() {
        let mut page = String::from("<html><body>");
        for index in 0..30 {
            page.push_str(&format!(
                "<div class=\"relInfo\"><div class=\"relReleaseName\"><a href=\"/releases/r/{index}\">R</a></div></div>"
            ));
        }
        page.push_str("</body></html>");

        let mut search = Search::new("r");
        search.prepare(&page).expect("fixture prepares");
        assert_eq!(
            search.result_containers().expect("hits listed").len(),
            config::SEARCH_RESULT_CAP
        );
    }
}
