//! PostgreSQL implementation of [`MovieStore`] on top of sqlx.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use data_loader::{EnrichedMovie, EnrichedRating, MovieId};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{Connection, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::store::{MovieStore, MovieTransaction};

const INSERT_MOVIE: &str = "INSERT INTO movies (movie_id, title, release_year, director, plot, box_office) \
     VALUES ($1, $2, $3, $4, $5, $6) \
     ON CONFLICT (movie_id) DO NOTHING";

const INSERT_GENRE: &str = "INSERT INTO genres (genre_name) VALUES ($1) \
     ON CONFLICT (genre_name) DO NOTHING";

const LINK_GENRE: &str = "INSERT INTO movie_genres (movie_id, genre_id) \
     SELECT $1, genre_id FROM genres WHERE genre_name = $2 \
     ON CONFLICT DO NOTHING";

/// How long to wait for the single connection before giving up
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Store backed by a PostgreSQL database.
///
/// The pool holds one connection: the job is sequential, and the
/// transaction and the ratings append never overlap.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Prepare a store for `database_url` without connecting yet.
    ///
    /// Only the URL is validated here; reachability is the job of
    /// [`MovieStore::check_connection`].
    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    #[instrument(skip(database_url))]
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let options = PgConnectOptions::from_str(database_url)?;
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MovieStore for PgStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn check_connection(&self) -> Result<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        info!("Database connection successful (SELECT 1 -> {one})");
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn MovieTransaction + '_>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn append_ratings(&self, ratings: &[EnrichedRating]) -> Result<u64> {
        if ratings.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            r#"INSERT INTO ratings ("userId", "movieId", rating, rating_timestamp) "#,
        );
        builder.push_values(ratings, |mut row, rating| {
            row.push_bind(rating.user_id)
                .push_bind(rating.movie_id)
                .push_bind(rating.rating)
                .push_bind(rating.rating_timestamp);
        });

        let done = builder.build().execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

/// An open PostgreSQL transaction.
///
/// Each write runs inside its own savepoint. PostgreSQL refuses every
/// statement after an error until the transaction is rolled back, so a
/// failed write is rolled back to its savepoint and the transaction stays
/// usable for the next one.
struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgTransaction {
    async fn execute_in_savepoint(
        &mut self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<u64> {
        let mut savepoint = Connection::begin(&mut *self.tx).await?;
        match query.execute(&mut *savepoint).await {
            Ok(done) => {
                savepoint.commit().await?;
                Ok(done.rows_affected())
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl MovieTransaction for PgTransaction {
    async fn insert_movie(&mut self, movie: &EnrichedMovie) -> Result<bool> {
        let query = sqlx::query(INSERT_MOVIE)
            .bind(movie.movie_id)
            .bind(movie.clean_title.as_str())
            .bind(movie.release_year)
            .bind(movie.director.as_deref())
            .bind(movie.plot.as_deref())
            .bind(movie.box_office.as_deref());
        Ok(self.execute_in_savepoint(query).await? == 1)
    }

    async fn insert_genre(&mut self, genre_name: &str) -> Result<bool> {
        let query = sqlx::query(INSERT_GENRE).bind(genre_name);
        Ok(self.execute_in_savepoint(query).await? == 1)
    }

    async fn link_genre(&mut self, movie_id: MovieId, genre_name: &str) -> Result<bool> {
        let query = sqlx::query(LINK_GENRE).bind(movie_id).bind(genre_name);
        Ok(self.execute_in_savepoint(query).await? == 1)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        debug!("movie/genre transaction committed");
        Ok(())
    }
}
