//! Error types for the warehouse crate.

use thiserror::Error;

/// Errors returned by a [`crate::MovieStore`] or one of its transactions
#[derive(Error, Debug)]
pub enum StoreError {
    /// Anything the database driver reports: unreachable host, bad
    /// credentials, missing table, constraint violation, ...
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write broke a key or reference rule of the in-memory store
    #[error("constraint violated: {0}")]
    Constraint(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
