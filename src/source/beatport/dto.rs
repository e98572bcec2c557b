//! Beatport catalog API Data Transfer Objects.
//!
//! These types match EXACTLY what the catalog API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the beatport module.
//!
//! The detail endpoint wraps its payload in an envelope whose `results`
//! member is an object for a single hit but a list otherwise, so the
//! envelope keeps it as raw JSON until the count has been checked.

use serde::Deserialize;

/// Envelope of the release detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    pub metadata: Metadata,
    #[serde(default)]
    pub results: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub count: u32,
}

/// The release object of a single-hit detail response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDetail {
    pub name: Option<String>,
    pub release_date: Option<String>,
    /// Release category ("Album", "Single", "Release", ...).
    pub category: Option<String>,
    pub label: Option<LabelRef>,
    pub catalog_number: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    #[serde(default)]
    pub tracks: Vec<TrackDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelRef {
    pub name: String,
}

/// Artist credit; `kind` distinguishes "artist" from "remixer" entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetail {
    pub name: Option<String>,
    pub mix_name: Option<String>,
    pub length: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Envelope of the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchRelease>,
}

/// One release entry of a search response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRelease {
    pub id: Option<u64>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub release_date: Option<String>,
    pub label: Option<LabelRef>,
    pub catalog_number: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_detail_envelope() {
        let json = r#"{
            "metadata": {"count": 1},
            "results": {
                "name": "Love Love Love Yeah",
                "releaseDate": "2007-01-22",
                "category": "Release",
                "label": {"name": "Playhouse"},
                "catalogNumber": "PLAY131"
            }
        }"#;

        let envelope: DetailResponse = serde_json::from_str(json).expect("envelope parses");
        assert_eq!(envelope.metadata.count, 1);

        let detail: ReleaseDetail =
            serde_json::from_value(envelope.results).expect("release parses");
        assert_eq!(detail.name.as_deref(), Some("Love Love Love Yeah"));
        assert_eq!(detail.release_date.as_deref(), Some("2007-01-22"));
        assert_eq!(detail.catalog_number.as_deref(), Some("PLAY131"));
        assert_eq!(detail.label.unwrap().name, "Playhouse");
        assert!(detail.tracks.is_empty());
    }

    #[test]
    fn test_parse_empty_envelope_keeps_list_results() {
        // a miss returns count 0 and a list-shaped results member
        let json = r#"{"metadata": {"count": 0}, "results": []}"#;
        let envelope: DetailResponse = serde_json::from_str(json).expect("envelope parses");
        assert_eq!(envelope.metadata.count, 0);
        assert!(envelope.results.is_array());
    }

    #[test]
    fn test_parse_tracks_with_mix_and_credits() {
        let json = r#"{
            "name": "Love Spy / Love Dies",
            "tracks": [{
                "name": "Love Spy / Love Dies",
                "mixName": "Error Error Remix",
                "length": "07:27",
                "artists": [
                    {"name": "Polygamy Boys", "type": "Artist"},
                    {"name": "Error Error", "type": "Remixer"}
                ]
            }]
        }"#;

        let detail: ReleaseDetail = serde_json::from_str(json).expect("release parses");
        let track = &detail.tracks[0];
        assert_eq!(track.mix_name.as_deref(), Some("Error Error Remix"));
        assert_eq!(track.length.as_deref(), Some("07:27"));
        assert_eq!(track.artists[0].kind, "Artist");
        assert_eq!(track.artists[1].name, "Error Error");
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "results": [{
                "id": 43577,
                "slug": "love-love-love-yeah",
                "name": "Love Love Love Yeah",
                "category": "Release",
                "releaseDate": "2007-01-22",
                "label": {"name": "Playhouse"},
                "catalogNumber": "PLAY131",
                "artists": [{"name": "Rework", "type": "Artist"}]
            }, {
                "name": "entry without id"
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("search parses");
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].id, Some(43577));
        assert_eq!(response.results[0].slug.as_deref(), Some("love-love-love-yeah"));
        assert_eq!(response.results[1].id, None);
    }
}
