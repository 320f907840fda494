//! CSV extraction for the movie and rating files.
//!
//! Both files carry a header row, and columns are matched by header name:
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Column order doesn't matter and extra columns are ignored. Column types
//! come from the target struct (integers, floats, strings).

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Open a file, mapping "not found" to its own error variant so the
/// caller can report it distinctly from other I/O failures.
fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::Io {
            path: path.display().to_string(),
            source,
        },
    })
}

/// Deserialize every record of a headed CSV file into `T`
///
/// Stops at the first record that doesn't fit `T`.
fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = open_file(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    // Fail early on an unreadable header instead of on the first row
    reader.headers().map_err(|source| DataLoadError::Csv {
        file: file_name.clone(),
        source,
    })?;

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<T>().enumerate() {
        let row = record.map_err(|e| DataLoadError::ParseError {
            file: file_name.clone(),
            // header is line 1, first record is line 2
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2),
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse the movies file
///
/// Format: movieId,title,genres
///
/// Titles often contain commas and are quoted: `"American President, The (1995)"`.
pub fn parse_movies(path: &Path) -> Result<Vec<RawMovieRow>> {
    read_table(path)
}

/// Parse the ratings file
///
/// Format: userId,movieId,rating,timestamp
pub fn parse_ratings(path: &Path) -> Result<Vec<RawRatingRow>> {
    read_table(path)
}
