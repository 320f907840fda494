//! Run configuration.
//!
//! Built once by the binary and handed to [`crate::EtlOrchestrator`]; no
//! component reads the environment on its own.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where enriched records are written
#[derive(Clone, PartialEq, Eq)]
pub enum Destination {
    /// PostgreSQL reached through a connection URL
    Postgres { database_url: String },
    /// Process memory; nothing outlives the run
    Memory,
}

impl fmt::Debug for Destination {
    // The URL may embed a password, so it is never printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Postgres { .. } => f.write_str("Postgres { database_url: <redacted> }"),
            Destination::Memory => f.write_str("Memory"),
        }
    }
}

/// Everything a run needs to know
#[derive(Clone)]
pub struct EtlConfig {
    pub destination: Destination,
    /// `None` disables enrichment; movies are still loaded
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub movies_path: PathBuf,
    pub ratings_path: PathBuf,
    /// Movies enriched and loaded, from the top of the file
    pub movie_limit: usize,
    /// Ratings loaded, from the top of the file
    pub rating_limit: usize,
    /// Timeout for each metadata request
    pub request_timeout: Duration,
    /// Pause between two consecutive metadata requests
    pub lookup_delay: Duration,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            destination: Destination::Memory,
            omdb_api_key: None,
            omdb_base_url: omdb_client::DEFAULT_BASE_URL.to_string(),
            movies_path: PathBuf::from("movies.csv"),
            ratings_path: PathBuf::from("ratings.csv"),
            movie_limit: 5,
            rating_limit: 10,
            request_timeout: omdb_client::DEFAULT_TIMEOUT,
            lookup_delay: Duration::from_millis(200),
        }
    }
}

impl fmt::Debug for EtlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtlConfig")
            .field("destination", &self.destination)
            .field("omdb_api_key", &self.omdb_api_key.as_ref().map(|_| "<redacted>"))
            .field("omdb_base_url", &self.omdb_base_url)
            .field("movies_path", &self.movies_path)
            .field("ratings_path", &self.ratings_path)
            .field("movie_limit", &self.movie_limit)
            .field("rating_limit", &self.rating_limit)
            .field("request_timeout", &self.request_timeout)
            .field("lookup_delay", &self.lookup_delay)
            .finish()
    }
}
