//! Release Scout - normalizes heterogeneous music-release metadata from
//! differently structured web sources into one canonical schema.
//!
//! # Architecture
//!
//! This crate follows a clean separation between:
//! - **Canonical schema** (`model`) - The normalized Release/Track/Artist
//!   shapes, independent of any source
//! - **Artist normalizer** (`normalize`) - Pure parsing of raw credit text
//!   into typed artist lists
//! - **Adapter contract** (`source`) - The hook set every per-site source
//!   implements, plus the bundled Beatport and Audiojelly sources
//! - **Orchestrators** (`extract`) - The fixed, site-independent pipelines
//!   driving those hooks into assembled results
//!
//! This decoupling means:
//! 1. Site markup changes stay inside one adapter
//! 2. The assembly policy is tested once, against scripted sources
//! 3. New sources only implement field location, never iteration
//!
//! # Usage
//!
//! ```ignore
//! use release_scout::{ReleaseExtractor, source::beatport};
//!
//! let source = beatport::Release::from_url(url).expect("a beatport release URL");
//! let mut extraction = ReleaseExtractor::new(source);
//! let release = extraction.extract().await?;
//! println!("{}", serde_json::to_string_pretty(release)?);
//! ```
//!
//! The crate performs exactly one transport request per extraction and
//! keeps no state beyond the extractor instance; callers that want
//! concurrency run one extractor per release on their own runtime.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod source;

pub use error::{ExtractError, Result};
pub use extract::{ReleaseExtractor, SearchExtractor};
pub use model::{Artist, ArtistRole, Disc, Release, SearchResult, Track};
pub use source::{ArtistCredit, ReleaseSource, SearchSource};
