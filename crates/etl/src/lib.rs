//! # ETL Crate
//!
//! Wires the extraction, transform and load crates into one sequential run.
//!
//! ## Main Components
//!
//! - **config**: [`EtlConfig`], everything a run needs, with secrets redacted in `Debug`
//! - **orchestrator**: [`EtlOrchestrator`], which runs the stages and returns a [`RunReport`]
//! - **error**: [`EtlError`], the fatal outcomes of a run
//!
//! ## Example Usage
//!
//! ```ignore
//! use etl::{EtlConfig, EtlOrchestrator};
//!
//! let orchestrator = EtlOrchestrator::from_config(EtlConfig::default())?;
//! let report = orchestrator.run().await?;
//! println!("{} movies loaded", report.load.movies_inserted);
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{Destination, EtlConfig};
pub use error::{EtlError, Result};
pub use orchestrator::{EtlOrchestrator, RunReport};
