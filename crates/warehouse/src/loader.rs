//! The load stage: enriched movies, their genres, and a prefix of ratings.
//!
//! Failure policy:
//! - opening or committing the movie/genre transaction is fatal (`Err`)
//! - a single movie, genre, or link write that fails is logged, counted,
//!   and skipped; the loop and the transaction carry on
//! - the ratings append runs after the commit and its failure is only
//!   recorded in the report

use std::sync::Arc;

use data_loader::{EnrichedMovie, EnrichedRating};
use tracing::{info, warn};

use crate::error::Result;
use crate::store::MovieStore;

/// What the load stage did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub movies_inserted: usize,
    /// Movie already present; existing row kept
    pub movies_skipped: usize,
    pub movies_failed: usize,
    pub genres_inserted: usize,
    pub links_inserted: usize,
    /// Link already present
    pub links_skipped: usize,
    /// Genre insert or link insert failed
    pub links_failed: usize,
    pub ratings_inserted: u64,
    pub ratings_failed: bool,
}

/// Writes transformed records into a [`MovieStore`].
#[derive(Clone)]
pub struct Loader {
    store: Arc<dyn MovieStore>,
    rating_limit: usize,
}

impl Loader {
    /// # Arguments
    /// * `store` - destination
    /// * `rating_limit` - how many ratings from the front of the table to append
    pub fn new(store: Arc<dyn MovieStore>, rating_limit: usize) -> Self {
        Self {
            store,
            rating_limit,
        }
    }

    /// Load movies (with genres and links) and then the ratings prefix.
    pub async fn load(
        &self,
        movies: &[EnrichedMovie],
        ratings: &[EnrichedRating],
    ) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        self.load_movies(movies, &mut report).await?;
        self.load_ratings(ratings, &mut report).await;
        Ok(report)
    }

    /// Write every movie and its genre links in one transaction.
    pub async fn load_movies(
        &self,
        movies: &[EnrichedMovie],
        report: &mut LoadReport,
    ) -> Result<()> {
        info!("Loading {} movies into {}", movies.len(), self.store.name());
        let mut tx = self.store.begin().await?;

        for movie in movies {
            match tx.insert_movie(movie).await {
                Ok(true) => report.movies_inserted += 1,
                Ok(false) => report.movies_skipped += 1,
                Err(e) => {
                    warn!(
                        movie_id = movie.movie_id,
                        "Failed to insert movie {}: {}", movie.clean_title, e
                    );
                    report.movies_failed += 1;
                }
            }

            // Genres are attempted even when the movie write failed; a link
            // to a missing movie then fails on its own and is counted.
            for genre in &movie.genres {
                match tx.insert_genre(genre).await {
                    Ok(true) => report.genres_inserted += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(
                            movie_id = movie.movie_id,
                            "Failed to insert genre mapping for {} - {}: {}",
                            movie.clean_title,
                            genre,
                            e
                        );
                        report.links_failed += 1;
                        continue;
                    }
                }

                match tx.link_genre(movie.movie_id, genre).await {
                    Ok(true) => report.links_inserted += 1,
                    Ok(false) => report.links_skipped += 1,
                    Err(e) => {
                        warn!(
                            movie_id = movie.movie_id,
                            "Failed to insert genre mapping for {} - {}: {}",
                            movie.clean_title,
                            genre,
                            e
                        );
                        report.links_failed += 1;
                    }
                }
            }
        }

        tx.commit().await?;
        info!(
            "Movies committed: inserted={}, skipped={}, failed={}; genre links inserted={}, failed={}",
            report.movies_inserted,
            report.movies_skipped,
            report.movies_failed,
            report.links_inserted,
            report.links_failed
        );
        Ok(())
    }

    /// Append the first `rating_limit` ratings. Never fails the run.
    pub async fn load_ratings(&self, ratings: &[EnrichedRating], report: &mut LoadReport) {
        let prefix = &ratings[..self.rating_limit.min(ratings.len())];
        info!("Loading {} of {} ratings", prefix.len(), ratings.len());

        match self.store.append_ratings(prefix).await {
            Ok(rows) => report.ratings_inserted = rows,
            Err(e) => {
                warn!("Failed to insert ratings: {}", e);
                report.ratings_failed = true;
            }
        }
    }
}
