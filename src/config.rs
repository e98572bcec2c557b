//! Process-wide extraction settings.
//!
//! Everything here is fixed at startup and shared read-only by every
//! orchestrator/adapter pair. Nothing in this module is mutated during an
//! extraction run, which is what makes concurrent extractions safe without
//! extra synchronization.

/// User-Agent sent with every source request.
///
/// Some stores reject requests carrying the default library User-Agent.
pub const USER_AGENT: &str = concat!("ReleaseScout/", env!("CARGO_PKG_VERSION"));

/// Canonical name of the synthetic artist used for compilation releases.
pub const VARIOUS_ARTIST_NAME: &str = "Various";

/// Raw artist strings equal (case-sensitively) to one of these aliases are
/// reported as the single synthetic [`VARIOUS_ARTIST_NAME`] artist.
pub const VARIOUS_ARTIST_ALIASES: &[&str] = &["Various", "Various Artists"];

/// Sources cap their search result lists to this many hits.
pub const SEARCH_RESULT_CAP: usize = 25;
