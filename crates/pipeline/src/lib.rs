//! Transform and enrichment stage of the movie ETL job.
//!
//! This crate provides:
//! - pure transforms: title/year parsing, decade, genre splitting, timestamp conversion
//! - the [`MetadataLookup`] trait for external metadata sources
//! - the [`Enricher`] that walks the bounded movie prefix and applies lookups
//!
//! ## Architecture
//! Movies and ratings are transformed independently:
//! 1. The first N movies get local fields derived, then one lookup each
//! 2. Every rating gets its calendar timestamp derived
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Enricher, transform};
//!
//! let enricher = Enricher::new(omdb.clone(), Duration::from_millis(200));
//! let (movies, stats) = enricher.enrich_movies(dataset.movie_prefix(5)).await;
//! let ratings = transform::transform_ratings(&dataset.ratings)?;
//! ```

pub mod enrich;
pub mod error;
pub mod traits;
pub mod transform;

// Re-export main types
pub use enrich::{EnrichmentStats, Enricher};
pub use error::TransformError;
pub use traits::MetadataLookup;
