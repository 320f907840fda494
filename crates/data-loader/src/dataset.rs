//! Loading the two input tables into a [`Dataset`].

use crate::error::Result;
use crate::parser;
use crate::types::Dataset;
use std::path::Path;
use tracing::info;

impl Dataset {
    /// Read both input files into memory
    ///
    /// Movies are read first, then ratings; a missing or unreadable file
    /// stops the load with an error and nothing is returned.
    pub fn load_from_files(movies_path: &Path, ratings_path: &Path) -> Result<Self> {
        info!(
            movies = %movies_path.display(),
            ratings = %ratings_path.display(),
            "Reading CSV files"
        );

        let movies = parser::parse_movies(movies_path)?;
        info!("Movies loaded: {} rows", movies.len());

        let ratings = parser::parse_ratings(ratings_path)?;
        info!("Ratings loaded: {} rows", ratings.len());

        Ok(Self { movies, ratings })
    }
}
