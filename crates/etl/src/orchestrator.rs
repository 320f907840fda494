//! # ETL Orchestrator
//!
//! This module runs the job's four stages, strictly one after another:
//! 1. Connection check against the destination (fatal on failure)
//! 2. Extract `movies.csv` and `ratings.csv` (fatal on failure)
//! 3. Transform: enrich the movie prefix, derive rating timestamps
//! 4. Load: movies/genres in one transaction, then the ratings prefix
//!
//! Nothing is spawned and nothing runs in parallel; the only waits are the
//! metadata requests, the pause between them, and the database calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use data_loader::Dataset;
use omdb_client::OmdbClient;
use pipeline::{EnrichmentStats, Enricher, MetadataLookup};
use tracing::{error, info, warn};
use warehouse::{LoadReport, Loader, MemoryStore, MovieStore, PgStore};

use crate::config::{Destination, EtlConfig};
use crate::error::{EtlError, Result};

/// Summary of a finished run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub movies_read: usize,
    pub ratings_read: usize,
    pub enrichment: EnrichmentStats,
    pub load: LoadReport,
    pub elapsed: Duration,
}

/// Runs the pipeline against one store with one (optional) metadata source.
#[derive(Clone)]
pub struct EtlOrchestrator {
    config: EtlConfig,
    store: Arc<dyn MovieStore>,
    enricher: Enricher,
    loader: Loader,
}

impl EtlOrchestrator {
    /// Assemble an orchestrator from explicit components.
    ///
    /// # Arguments
    /// * `config` - paths, limits and pacing for the run
    /// * `store` - destination for the load stage
    /// * `lookup` - metadata source; `None` loads movies without enrichment
    pub fn new(
        config: EtlConfig,
        store: Arc<dyn MovieStore>,
        lookup: Option<Arc<dyn MetadataLookup>>,
    ) -> Self {
        let enricher = match lookup {
            Some(lookup) => Enricher::new(lookup, config.lookup_delay),
            None => Enricher::disabled(),
        };
        let loader = Loader::new(store.clone(), config.rating_limit);
        Self {
            config,
            store,
            enricher,
            loader,
        }
    }

    /// Build the store and metadata client the configuration asks for.
    ///
    /// Nothing touches the network here; the store connects lazily during
    /// the connection check.
    pub fn from_config(config: EtlConfig) -> Result<Self> {
        let store: Arc<dyn MovieStore> = match &config.destination {
            Destination::Postgres { database_url } => Arc::new(
                PgStore::connect_lazy(database_url)
                    .map_err(|e| EtlError::Config(format!("database URL: {e}")))?,
            ),
            Destination::Memory => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Like [`Self::from_config`], but writing to a store the caller owns.
    ///
    /// `config.destination` is ignored.
    pub fn with_store(config: EtlConfig, store: Arc<dyn MovieStore>) -> Result<Self> {
        let lookup: Option<Arc<dyn MetadataLookup>> = match &config.omdb_api_key {
            Some(key) => Some(Arc::new(
                OmdbClient::new(key.clone(), &config.omdb_base_url, config.request_timeout)
                    .map_err(|e| EtlError::Config(e.to_string()))?,
            )),
            None => {
                warn!("No OMDb API key configured; movies will be loaded without enrichment");
                None
            }
        };

        Ok(Self::new(config, store, lookup))
    }

    /// The destination this orchestrator writes to.
    pub fn store(&self) -> &Arc<dyn MovieStore> {
        &self.store
    }

    /// Main entry point: run every stage once.
    pub async fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        let mut report = RunReport::default();

        // Stage 1
        self.check_connection().await?;

        // Stage 2
        let dataset = self.extract()?;
        (report.movies_read, report.ratings_read) = dataset.counts();

        // Stage 3
        let prefix = dataset.movie_prefix(self.config.movie_limit);
        info!(
            "Fetching metadata for the first {} of {} movies",
            prefix.len(),
            dataset.movies.len()
        );
        let (movies, enrichment) = self.enricher.enrich_movies(prefix).await;
        report.enrichment = enrichment;

        info!("Transforming ratings timestamps...");
        let ratings = pipeline::transform::transform_ratings(&dataset.ratings)?;

        // Stage 4
        report.load = self.loader.load(&movies, &ratings).await.map_err(|e| {
            error!("Load failed: {}", e);
            EtlError::Load(e)
        })?;

        report.elapsed = start_time.elapsed();
        info!("ETL run finished in {:.2?}", report.elapsed);
        Ok(report)
    }

    /// Verify the destination answers before doing any other work.
    async fn check_connection(&self) -> Result<()> {
        info!("Connecting to {} store...", self.store.name());
        self.store.check_connection().await.map_err(|e| {
            error!("Database connection failed: {}", e);
            EtlError::ConnectionCheck(e)
        })
    }

    fn extract(&self) -> Result<Dataset> {
        let config = &self.config;
        Dataset::load_from_files(&config.movies_path, &config.ratings_path).map_err(|e| {
            error!("Extraction failed: {}", e);
            EtlError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_loader::{EnrichedRating, MovieMetadata};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use warehouse::{MovieTransaction, StoreError};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    const MOVIES_CSV: &str = "\
movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,Grumpier Old Men (1995),Comedy|Romance
4,Waiting to Exhale (1995),Comedy|Drama|Romance
5,Father of the Bride Part II (1995),Comedy
6,Heat (1995),Action|Crime|Thriller
";

    fn ratings_csv(rows: usize) -> String {
        let mut csv = String::from("userId,movieId,rating,timestamp\n");
        for i in 0..rows {
            csv.push_str(&format!("{},1,4.0,{}\n", i + 1, 1_609_459_200 + i));
        }
        csv
    }

    /// Write both CSV files into a temp dir and point a config at them
    fn build_test_config(ratings: usize) -> (EtlConfig, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let movies_path = dir.path().join("movies.csv");
        let ratings_path = dir.path().join("ratings.csv");
        fs::write(&movies_path, MOVIES_CSV).unwrap();
        fs::write(&ratings_path, ratings_csv(ratings)).unwrap();

        let config = EtlConfig {
            movies_path,
            ratings_path,
            lookup_delay: Duration::ZERO,
            ..EtlConfig::default()
        };
        (config, dir)
    }

    /// Knows Toy Story only, and counts how often it is asked
    #[derive(Default)]
    struct CountingLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetadataLookup for CountingLookup {
        fn name(&self) -> &str {
            "counting"
        }

        async fn lookup(
            &self,
            title: &str,
            _year: Option<i32>,
        ) -> anyhow::Result<Option<MovieMetadata>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((title == "Toy Story").then(|| MovieMetadata {
                director: Some("John Lasseter".to_string()),
                plot: Some("Toys come alive.".to_string()),
                box_office: Some("$223,225,679".to_string()),
            }))
        }
    }

    /// A destination that is never reachable
    struct UnreachableStore;

    #[async_trait]
    impl MovieStore for UnreachableStore {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn check_connection(&self) -> warehouse::Result<()> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn begin(&self) -> warehouse::Result<Box<dyn MovieTransaction + '_>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn append_ratings(&self, _ratings: &[EnrichedRating]) -> warehouse::Result<u64> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    // ============================================================================
    // Integration Tests
    // ============================================================================

    #[tokio::test]
    async fn test_full_run_against_memory_store() {
        let (config, _dir) = build_test_config(25);
        let store = Arc::new(MemoryStore::new());
        let lookup = Arc::new(CountingLookup::default());
        let orchestrator = EtlOrchestrator::new(config, store.clone(), Some(lookup.clone()));

        let report = orchestrator.run().await.expect("run failed");

        assert_eq!(report.movies_read, 6);
        assert_eq!(report.ratings_read, 25);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 5, "only the prefix is looked up");
        assert_eq!(report.enrichment.found, 1);
        assert_eq!(report.enrichment.not_found, 4);
        assert_eq!(report.load.movies_inserted, 5);
        assert_eq!(report.load.ratings_inserted, 10);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.movies.len(), 5);
        assert!(!snapshot.movies.contains_key(&6), "Heat is outside the prefix");
        assert_eq!(snapshot.ratings.len(), 10);

        let toy_story = &snapshot.movies[&1];
        assert_eq!(toy_story.title, "Toy Story");
        assert_eq!(toy_story.release_year, Some(1995));
        assert_eq!(toy_story.director.as_deref(), Some("John Lasseter"));
    }

    #[tokio::test]
    async fn test_not_found_movie_is_still_inserted_with_null_metadata() {
        let (config, _dir) = build_test_config(1);
        let store = Arc::new(MemoryStore::new());
        let orchestrator =
            EtlOrchestrator::new(config, store.clone(), Some(Arc::new(CountingLookup::default())));

        orchestrator.run().await.unwrap();

        let jumanji = &store.snapshot().movies[&2];
        assert_eq!(jumanji.title, "Jumanji");
        assert_eq!(jumanji.director, None);
        assert_eq!(jumanji.plot, None);
        assert_eq!(jumanji.box_office, None);
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate_movies_or_genres() {
        let (config, _dir) = build_test_config(3);
        let store = Arc::new(MemoryStore::new());
        let orchestrator = EtlOrchestrator::new(config, store.clone(), None);

        orchestrator.run().await.unwrap();
        let first = store.snapshot();
        let second_report = orchestrator.run().await.unwrap();
        let second = store.snapshot();

        assert_eq!(second_report.load.movies_inserted, 0);
        assert_eq!(second_report.load.movies_skipped, 5);
        assert_eq!(first.movies.len(), second.movies.len());
        assert_eq!(first.genres, second.genres);
        assert_eq!(first.movie_genres, second.movie_genres);
        // ratings are appended on every run
        assert_eq!(second.ratings.len(), 6);
    }

    #[tokio::test]
    async fn test_connection_failure_stops_before_extraction() {
        let config = EtlConfig {
            movies_path: "does/not/exist/movies.csv".into(),
            ratings_path: "does/not/exist/ratings.csv".into(),
            ..EtlConfig::default()
        };
        let lookup = Arc::new(CountingLookup::default());
        let orchestrator =
            EtlOrchestrator::new(config, Arc::new(UnreachableStore), Some(lookup.clone()));

        let err = orchestrator.run().await.unwrap_err();

        // Extraction would have failed with Extract; it never ran
        assert!(matches!(err, EtlError::ConnectionCheck(_)), "{err:?}");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_input_file_is_fatal() {
        let (mut config, _dir) = build_test_config(1);
        config.ratings_path = config.ratings_path.with_file_name("missing.csv");
        let store = Arc::new(MemoryStore::new());
        let orchestrator = EtlOrchestrator::new(config, store.clone(), None);

        let err = orchestrator.run().await.unwrap_err();

        assert!(matches!(err, EtlError::Extract(_)), "{err:?}");
        assert!(store.snapshot().movies.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_without_api_key_disables_enrichment() {
        let (config, _dir) = build_test_config(1);

        let orchestrator = EtlOrchestrator::from_config(config).unwrap();
        assert_eq!(orchestrator.store().name(), "memory");

        let report = orchestrator.run().await.unwrap();
        assert_eq!(report.enrichment.processed, 5);
        assert_eq!(report.enrichment.found + report.enrichment.not_found, 0);
    }

    #[test]
    fn test_with_store_rejects_empty_api_key() {
        let config = EtlConfig {
            omdb_api_key: Some(String::new()),
            ..EtlConfig::default()
        };

        let err = EtlOrchestrator::with_store(config, Arc::new(MemoryStore::new()))
            .err()
            .unwrap();
        assert!(matches!(err, EtlError::Config(_)));
    }

    #[test]
    fn test_from_config_rejects_bad_database_url() {
        let config = EtlConfig {
            destination: Destination::Postgres {
                database_url: "not a url".into(),
            },
            ..EtlConfig::default()
        };

        let err = EtlOrchestrator::from_config(config).err().unwrap();
        assert!(matches!(err, EtlError::Config(_)));
    }
}
