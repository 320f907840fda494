//! In-memory implementation of [`MovieStore`].
//!
//! Used for `--dry-run` and in tests. It follows the same conflict rules as
//! the PostgreSQL schema: movies are keyed by id, genres by name, links by
//! `(movie_id, genre_id)`, and a link must point at an existing movie.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use data_loader::{EnrichedMovie, EnrichedRating, MovieId};

use crate::error::{Result, StoreError};
use crate::store::{MovieStore, MovieTransaction};

/// Surrogate key of a genre
pub type GenreId = i32;

/// A `movies` row as the store keeps it
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub title: String,
    pub release_year: Option<i32>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
}

impl From<&EnrichedMovie> for MovieRow {
    fn from(movie: &EnrichedMovie) -> Self {
        Self {
            title: movie.clean_title.clone(),
            release_year: movie.release_year,
            director: movie.director.clone(),
            plot: movie.plot.clone(),
            box_office: movie.box_office.clone(),
        }
    }
}

/// Full contents of a [`MemoryStore`]
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    pub movies: BTreeMap<MovieId, MovieRow>,
    pub genres: BTreeMap<String, GenreId>,
    pub movie_genres: BTreeSet<(MovieId, GenreId)>,
    pub ratings: Vec<EnrichedRating>,
    next_genre_id: GenreId,
}

impl MemorySnapshot {
    /// Genre names linked to a movie, sorted
    pub fn genres_of(&self, movie_id: MovieId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .genres
            .iter()
            .filter(|(_, id)| self.movie_genres.contains(&(movie_id, **id)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Store that keeps everything in process memory.
///
/// A transaction works on a private copy of the data and replaces the
/// shared state on commit, so uncommitted writes are never visible.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemorySnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed contents
    pub fn snapshot(&self) -> MemorySnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemorySnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn check_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn MovieTransaction + '_>> {
        Ok(Box::new(MemoryTransaction {
            store: self,
            staged: self.snapshot(),
        }))
    }

    async fn append_ratings(&self, ratings: &[EnrichedRating]) -> Result<u64> {
        self.lock().ratings.extend_from_slice(ratings);
        Ok(ratings.len() as u64)
    }
}

struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    staged: MemorySnapshot,
}

#[async_trait]
impl MovieTransaction for MemoryTransaction<'_> {
    async fn insert_movie(&mut self, movie: &EnrichedMovie) -> Result<bool> {
        if self.staged.movies.contains_key(&movie.movie_id) {
            return Ok(false);
        }
        self.staged.movies.insert(movie.movie_id, MovieRow::from(movie));
        Ok(true)
    }

    async fn insert_genre(&mut self, genre_name: &str) -> Result<bool> {
        if genre_name.is_empty() {
            return Err(StoreError::Constraint("genre_name must not be empty".into()));
        }
        if self.staged.genres.contains_key(genre_name) {
            return Ok(false);
        }
        self.staged.next_genre_id += 1;
        let id = self.staged.next_genre_id;
        self.staged.genres.insert(genre_name.to_string(), id);
        Ok(true)
    }

    async fn link_genre(&mut self, movie_id: MovieId, genre_name: &str) -> Result<bool> {
        let Some(&genre_id) = self.staged.genres.get(genre_name) else {
            return Ok(false);
        };
        if !self.staged.movies.contains_key(&movie_id) {
            return Err(StoreError::Constraint(format!(
                "movie_genres.movie_id {movie_id} does not reference a movie"
            )));
        }
        Ok(self.staged.movie_genres.insert((movie_id, genre_id)))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        *self.store.lock() = self.staged;
        Ok(())
    }
}
