//! # Data Loader Crate
//!
//! This crate owns the domain types of the movie ETL job and the extraction
//! stage that reads `movies.csv` and `ratings.csv` into memory.
//!
//! ## Main Components
//!
//! - **types**: Raw rows, enriched records, and the [`Dataset`] holding both tables
//! - **parser**: Header-driven CSV parsing into typed rows
//! - **dataset**: Loading both files in one call
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(
//!     Path::new("movies.csv"),
//!     Path::new("ratings.csv"),
//! )?;
//!
//! let (movies, ratings) = dataset.counts();
//! println!("{movies} movies, {ratings} ratings");
//! ```

// Public modules
pub mod dataset;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Raw rows
    RawMovieRow,
    RawRatingRow,
    // Enriched records
    EnrichedMovie,
    EnrichedRating,
    MovieMetadata,
    // Container
    Dataset,
};
