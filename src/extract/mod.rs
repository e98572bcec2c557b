//! Extraction orchestrators.
//!
//! One fixed, site-independent pipeline per extraction kind drives the
//! hooks of a [`crate::source`] adapter and assembles the canonical
//! result. The orchestrators perform no I/O of their own beyond asking
//! the adapter for its single transport fetch, and each memoizes its
//! assembled result so repeated access never re-fetches or re-normalizes.

pub mod release;
pub mod search;

pub use release::ReleaseExtractor;
pub use search::SearchExtractor;
