//! Fatal errors of an ETL run.
//!
//! Anything that ends up here stops the run. Soft failures (a lookup that
//! failed, a row that couldn't be written) never become an `EtlError`; they
//! are counted in the [`crate::RunReport`] instead.

use data_loader::DataLoadError;
use pipeline::TransformError;
use thiserror::Error;
use warehouse::StoreError;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("database connection failed: {0}")]
    ConnectionCheck(#[source] StoreError),

    #[error("failed to read input files: {0}")]
    Extract(#[from] DataLoadError),

    #[error("failed to transform ratings: {0}")]
    Transform(#[from] TransformError),

    #[error("failed to load movies: {0}")]
    Load(#[source] StoreError),
}

pub type Result<T> = std::result::Result<T, EtlError>;
