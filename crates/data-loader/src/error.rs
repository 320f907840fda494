//! Error types for the data-loader crate.
//!
//! Every variant here is fatal for a run: the extractor has no notion of
//! skipping a bad row, it reports the first problem and stops.

use thiserror::Error;

/// Errors that can occur while reading the movie and rating files
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("CSV file not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while opening or reading a file
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file (bad header, unterminated quote, ...)
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A row couldn't be converted into its typed form
    ///
    /// `line` is the 1-based line in the file, header included.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
