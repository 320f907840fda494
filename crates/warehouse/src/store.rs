//! The storage seam between the loader and a concrete database.

use async_trait::async_trait;
use data_loader::{EnrichedMovie, EnrichedRating, MovieId};

use crate::error::Result;

/// A destination for enriched movies and ratings.
///
/// Movies, genres and their links are written through a
/// [`MovieTransaction`] so they commit together; ratings are appended by a
/// separate statement outside that transaction.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Short backend name for logs ("postgres", "memory")
    fn name(&self) -> &str;

    /// Run a trivial query to prove the store is reachable.
    async fn check_connection(&self) -> Result<()>;

    /// Open the transaction used for all movie and genre writes.
    async fn begin(&self) -> Result<Box<dyn MovieTransaction + '_>>;

    /// Append ratings in one bulk statement; returns rows written.
    ///
    /// Ratings carry no key, so appending the same rows twice stores them
    /// twice.
    async fn append_ratings(&self, ratings: &[EnrichedRating]) -> Result<u64>;
}

/// Writes inside one all-or-nothing scope.
///
/// Every write is insert-or-skip: `Ok(true)` means a row was written,
/// `Ok(false)` means an existing row won and nothing changed. A failed write
/// leaves the transaction usable, so the caller may log it and carry on.
/// Dropping the transaction without [`commit`](Self::commit) discards it.
#[async_trait]
pub trait MovieTransaction: Send {
    /// Insert the movie keyed by `movie_id`; an existing row is kept as is.
    async fn insert_movie(&mut self, movie: &EnrichedMovie) -> Result<bool>;

    /// Insert a genre by name; an existing genre is kept.
    async fn insert_genre(&mut self, genre_name: &str) -> Result<bool>;

    /// Link a movie to the genre with this name; an existing link is kept.
    ///
    /// The genre's surrogate key is resolved by name as part of the insert;
    /// an unknown name writes nothing.
    async fn link_genre(&mut self, movie_id: MovieId, genre_name: &str) -> Result<bool>;

    /// Make every successful write visible.
    async fn commit(self: Box<Self>) -> Result<()>;
}
