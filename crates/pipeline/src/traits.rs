//! Core traits for the enrichment stage.
//!
//! The enricher only knows movies by title and year; where the extra fields
//! come from is hidden behind [`MetadataLookup`], so the HTTP client can be
//! swapped for a stub in tests.

use anyhow::Result;
use async_trait::async_trait;
use data_loader::MovieMetadata;

/// A source of extra movie fields keyed by title and optional release year.
///
/// ## Contract
/// - `Ok(Some(metadata))` - the source knows the movie
/// - `Ok(None)` - the source answered but has nothing for this movie
///   (not found, or a non-success status); this is not an error
/// - `Err` - the source couldn't be asked at all (transport failure,
///   undecodable body); the caller decides whether to continue
///
/// Implementations make exactly one attempt per call: no retries, no backoff.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Returns the name of this source (for logging/debugging)
    fn name(&self) -> &str;

    /// Look up a single movie.
    async fn lookup(&self, title: &str, year: Option<i32>) -> Result<Option<MovieMetadata>>;
}
