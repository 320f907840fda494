use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use etl::{Destination, EtlConfig, EtlOrchestrator, RunReport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use warehouse::{MemorySnapshot, MemoryStore};

/// movie-etl - load MovieLens movies and ratings into PostgreSQL
#[derive(Parser)]
#[command(name = "movie-etl")]
#[command(about = "Extract MovieLens CSVs, enrich with OMDb, load into PostgreSQL")]
#[command(long_about = None)]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// OMDb API key; enrichment is skipped without one
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    omdb_api_key: Option<String>,

    /// OMDb endpoint
    #[arg(long, env = "OMDB_BASE_URL", default_value = "http://www.omdbapi.com/")]
    omdb_base_url: String,

    /// Path to movies.csv
    #[arg(long = "movies", env = "MOVIES_CSV", default_value = "movies.csv")]
    movies_path: PathBuf,

    /// Path to ratings.csv
    #[arg(long = "ratings", env = "RATINGS_CSV", default_value = "ratings.csv")]
    ratings_path: PathBuf,

    /// Number of movies to enrich and load
    #[arg(long, env = "MOVIE_LIMIT", default_value = "5")]
    movie_limit: usize,

    /// Number of ratings to load
    #[arg(long, env = "RATING_LIMIT", default_value = "10")]
    rating_limit: usize,

    /// Timeout for each OMDb request, in seconds
    #[arg(long, default_value = "5")]
    request_timeout_secs: u64,

    /// Pause between two OMDb requests, in milliseconds
    #[arg(long, default_value = "200")]
    lookup_delay_ms: u64,

    /// Run against an in-memory store and print what would be written
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_config(self) -> Result<EtlConfig> {
        let destination = if self.dry_run {
            Destination::Memory
        } else {
            match self.database_url {
                Some(database_url) if !database_url.trim().is_empty() => {
                    Destination::Postgres { database_url }
                }
                _ => bail!("DATABASE_URL is not set (pass --database-url, or --dry-run)"),
            }
        };

        Ok(EtlConfig {
            destination,
            omdb_api_key: self.omdb_api_key.filter(|key| !key.trim().is_empty()),
            omdb_base_url: self.omdb_base_url,
            movies_path: self.movies_path,
            ratings_path: self.ratings_path,
            movie_limit: self.movie_limit,
            rating_limit: self.rating_limit,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            lookup_delay: Duration::from_millis(self.lookup_delay_ms),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_config()?;
    tracing::debug!(?config, "configuration loaded");

    if config.destination == Destination::Memory {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = EtlOrchestrator::with_store(config, store.clone())?;
        let report = orchestrator.run().await.context("ETL run failed")?;
        print_report(&report);
        print_dry_run(&store.snapshot());
    } else {
        let orchestrator = EtlOrchestrator::from_config(config)?;
        let report = orchestrator.run().await.context("ETL run failed")?;
        print_report(&report);
    }

    Ok(())
}

/// Print the completion banner and run counts
fn print_report(report: &RunReport) {
    println!("{}", "ETL pipeline completed successfully!".bold().green());
    println!(
        "{}Read {} movies and {} ratings in {:.2?}",
        "• ".cyan(),
        report.movies_read,
        report.ratings_read,
        report.elapsed
    );

    let enrichment = &report.enrichment;
    println!(
        "{}Enriched {} movies: {} found, {} not found, {} failed",
        "• ".cyan(),
        enrichment.processed,
        enrichment.found.to_string().green(),
        enrichment.not_found,
        failure_count(enrichment.failed)
    );

    let load = &report.load;
    println!(
        "{}Movies: {} inserted, {} already present, {} failed",
        "• ".cyan(),
        load.movies_inserted.to_string().green(),
        load.movies_skipped,
        failure_count(load.movies_failed)
    );
    println!(
        "{}Genres: {} new; links {} inserted, {} already present, {} failed",
        "• ".cyan(),
        load.genres_inserted,
        load.links_inserted.to_string().green(),
        load.links_skipped,
        failure_count(load.links_failed)
    );
    if load.ratings_failed {
        println!("{}Ratings: {}", "• ".cyan(), "insert failed (see log)".red());
    } else {
        println!(
            "{}Ratings: {} inserted",
            "• ".cyan(),
            load.ratings_inserted.to_string().green()
        );
    }
}

fn failure_count(count: usize) -> colored::ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().red()
    }
}

/// Print what a dry run wrote to the in-memory store
fn print_dry_run(snapshot: &MemorySnapshot) {
    println!();
    println!("{}", "Dry run: nothing was written to PostgreSQL".bold().yellow());

    println!("{}", "Movies:".bold().blue());
    for (movie_id, movie) in &snapshot.movies {
        println!(
            "  {}. {} ({}) [{}]",
            movie_id.to_string().green(),
            movie.title,
            movie
                .release_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "?".to_string()),
            snapshot.genres_of(*movie_id).join(", ")
        );
        if let Some(director) = &movie.director {
            println!("     Director: {director}");
        }
        if let Some(box_office) = &movie.box_office {
            println!("     Box office: {box_office}");
        }
    }

    println!("{}", "Ratings:".bold().blue());
    for rating in &snapshot.ratings {
        println!(
            "  user {} -> movie {}: {} at {}",
            rating.user_id,
            rating.movie_id,
            rating.rating,
            rating.rating_timestamp.to_rfc3339()
        );
    }
}
