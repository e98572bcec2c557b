//! Search extraction: drives a [`SearchSource`] into an ordered list of
//! [`SearchResult`]s.
//!
//! Hits that do not resolve to an accessible release are dropped rather
//! than reported with partial data. A source whose "nothing found" answer
//! arrives as a transport error reports it as the typed
//! [`ExtractError::NotFound`]; exactly that condition becomes a successful
//! empty list here, while every other error stays fatal.

use crate::error::{ExtractError, Result};
use crate::model::SearchResult;
use crate::source::SearchSource;

/// One search extraction run.
///
/// Owns its source adapter and memoizes the assembled result list, with
/// the same single-fetch discipline as release extraction.
pub struct SearchExtractor<S: SearchSource> {
    source: S,
    results: Option<Vec<SearchResult<S::Release>>>,
}

impl<S: SearchSource> SearchExtractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            results: None,
        }
    }

    /// The adapter this extraction is bound to.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Extract the search results, or return the memoized list.
    pub async fn extract(&mut self) -> Result<&[SearchResult<S::Release>]> {
        if self.results.is_none() {
            let results = assemble(&mut self.source).await?;
            self.results = Some(results);
        }
        Ok(self.results.as_deref().expect("results memoized above"))
    }
}

async fn assemble<S: SearchSource>(source: &mut S) -> Result<Vec<SearchResult<S::Release>>> {
    tracing::debug!(search = %source.identity(), "extracting search results");

    let raw = match source.fetch().await {
        Ok(raw) => raw,
        Err(ExtractError::NotFound { identity }) => {
            tracing::debug!(search = %identity, "source reported no results");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };
    source.prepare(&raw)?;

    let mut results = Vec::new();
    for hit in source.result_containers()? {
        let name = source.result_name(&hit)?;
        let info = source.result_info(&hit)?;
        // only keep hits that resolve to a release we can actually access
        match source.result_release(&hit)? {
            Some(release) => results.push(SearchResult {
                name,
                info,
                release,
            }),
            None => {
                tracing::debug!(search = %source.identity(), hit = %name, "dropping unresolvable hit");
            }
        }
    }
    Ok(results)
}
