//! Enrichment of the bounded movie prefix with external metadata.

use std::sync::Arc;
use std::time::Duration;

use data_loader::{EnrichedMovie, RawMovieRow};
use tracing::{debug, info, warn};

use crate::traits::MetadataLookup;
use crate::transform::base_movie;

/// Outcome counts for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Movies processed (the bounded prefix)
    pub processed: usize,
    /// Lookups that returned metadata
    pub found: usize,
    /// Lookups that answered "no data"
    pub not_found: usize,
    /// Lookups that failed outright; the movie is kept without metadata
    pub failed: usize,
}

/// Turns raw movie rows into [`EnrichedMovie`]s, asking a [`MetadataLookup`]
/// for the extra fields one movie at a time.
///
/// ## Behaviour
/// - Lookups run strictly in order; there is a fixed `delay` between two
///   consecutive lookups and no other pacing.
/// - A lookup error never stops the pass: the movie is kept with empty
///   metadata and the failure is counted.
/// - With no lookup configured every movie passes through un-enriched.
#[derive(Clone)]
pub struct Enricher {
    lookup: Option<Arc<dyn MetadataLookup>>,
    delay: Duration,
}

impl Enricher {
    /// Create an enricher that queries `lookup` for every movie.
    pub fn new(lookup: Arc<dyn MetadataLookup>, delay: Duration) -> Self {
        Self {
            lookup: Some(lookup),
            delay,
        }
    }

    /// Create an enricher that only derives local fields.
    pub fn disabled() -> Self {
        Self {
            lookup: None,
            delay: Duration::ZERO,
        }
    }

    /// Whether a metadata source is configured.
    pub fn is_enabled(&self) -> bool {
        self.lookup.is_some()
    }

    /// Enrich every row in `rows`, preserving order.
    ///
    /// The caller decides how many rows to pass; this is the bounded prefix.
    pub async fn enrich_movies(
        &self,
        rows: &[RawMovieRow],
    ) -> (Vec<EnrichedMovie>, EnrichmentStats) {
        let mut stats = EnrichmentStats::default();
        let mut enriched = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let mut movie = base_movie(row);
            info!(
                "Processing: {} ({})",
                movie.clean_title,
                movie
                    .release_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "unknown year".to_string())
            );

            if let Some(lookup) = &self.lookup {
                if idx > 0 && !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }

                match lookup.lookup(&movie.clean_title, movie.release_year).await {
                    Ok(Some(metadata)) => {
                        debug!(movie_id = movie.movie_id, source = lookup.name(), "metadata found");
                        movie.apply_metadata(metadata);
                        stats.found += 1;
                    }
                    Ok(None) => {
                        info!(
                            movie_id = movie.movie_id,
                            "{} has no data for {}",
                            lookup.name(),
                            movie.clean_title
                        );
                        stats.not_found += 1;
                    }
                    Err(e) => {
                        warn!(
                            movie_id = movie.movie_id,
                            "{} lookup failed for {}: {:#}",
                            lookup.name(),
                            movie.clean_title,
                            e
                        );
                        stats.failed += 1;
                    }
                }
            }

            stats.processed += 1;
            enriched.push(movie);
        }

        info!(
            "Movies enriched: {} (found={}, not_found={}, failed={})",
            stats.processed, stats.found, stats.not_found, stats.failed
        );
        (enriched, stats)
    }
}
