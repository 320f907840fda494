//! Load stage of the movie ETL job.
//!
//! This crate provides:
//! - the [`MovieStore`] / [`MovieTransaction`] traits every destination implements
//! - [`PgStore`], the PostgreSQL destination (sqlx)
//! - [`MemoryStore`], an in-process destination for dry runs and tests
//! - the [`Loader`] that applies the insert-or-skip and soft-failure rules
//!
//! ## Example Usage
//! ```ignore
//! use warehouse::{Loader, PgStore, MovieStore};
//!
//! let store = Arc::new(PgStore::connect_lazy(&database_url)?);
//! store.check_connection().await?;
//!
//! let loader = Loader::new(store, 10);
//! let report = loader.load(&movies, &ratings).await?;
//! ```

pub mod error;
pub mod loader;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use loader::{LoadReport, Loader};
pub use memory::{MemorySnapshot, MemoryStore};
pub use postgres::PgStore;
pub use store::{MovieStore, MovieTransaction};

/// DDL of the destination tables
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");
