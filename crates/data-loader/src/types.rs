//! Core domain types for the movie ETL job.
//!
//! Two families of types live here:
//! - the raw rows exactly as they appear in `movies.csv` / `ratings.csv`
//! - the enriched records produced by the transform stage and consumed by
//!   the loader
//!
//! Column names of the raw files are part of the input contract, so the raw
//! rows map them with `#[serde(rename = ...)]` rather than renaming fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a movie; the join key across every table
pub type MovieId = i32;

/// Identifier of the user who submitted a rating
pub type UserId = i32;

// =============================================================================
// Raw Rows
// =============================================================================

/// One line of `movies.csv`
///
/// `title` carries the release year as a suffix, e.g. `"Toy Story (1995)"`,
/// and `genres` is pipe-delimited, e.g. `"Adventure|Animation|Children"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMovieRow {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
}

/// One line of `ratings.csv`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRatingRow {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub rating: f64,
    /// Unix timestamp (seconds) when the rating was made
    pub timestamp: i64,
}

// =============================================================================
// Enriched Records
// =============================================================================

/// Fields fetched from the external metadata service for a single movie
///
/// Every field is optional: the service may know the movie but not its box
/// office, for example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
}

/// A movie ready to be written to the `movies`, `genres` and `movie_genres`
/// tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMovie {
    pub movie_id: MovieId,
    /// Title with the trailing `(YYYY)` removed
    pub clean_title: String,
    pub release_year: Option<i32>,
    /// `(release_year / 10) * 10`, present only when the year is
    pub decade: Option<i32>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
    /// Genre names in source order
    pub genres: Vec<String>,
}

impl EnrichedMovie {
    /// Copy the lookup result onto this movie
    pub fn apply_metadata(&mut self, metadata: MovieMetadata) {
        self.director = metadata.director;
        self.plot = metadata.plot;
        self.box_office = metadata.box_office;
    }

    /// True when any of the looked-up fields is populated
    pub fn is_enriched(&self) -> bool {
        self.director.is_some() || self.plot.is_some() || self.box_office.is_some()
    }
}

/// A rating with its Unix timestamp converted to a calendar timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
    pub rating_timestamp: DateTime<Utc>,
}

// =============================================================================
// Dataset - both input tables held in memory
// =============================================================================

/// The two extracted tables, in file order
///
/// Ownership: the dataset owns every row; the transform stage borrows it and
/// produces new enriched records rather than mutating rows in place.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub movies: Vec<RawMovieRow>,
    pub ratings: Vec<RawRatingRow>,
}

impl Dataset {
    /// Creates a new, empty Dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in each table: `(movies, ratings)`
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.ratings.len())
    }

    /// The first `n` movies, or all of them when the table is shorter
    pub fn movie_prefix(&self, n: usize) -> &[RawMovieRow] {
        &self.movies[..n.min(self.movies.len())]
    }
}
