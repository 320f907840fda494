//! Pure field derivations for movies and ratings.
//!
//! Nothing in here touches the network or the database, so every function
//! is deterministic and cheap to test.

use chrono::{DateTime, Utc};
use data_loader::{EnrichedMovie, EnrichedRating, RawMovieRow, RawRatingRow};

use crate::error::TransformError;

/// A movie title split into its display part and release year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    pub clean_title: String,
    pub release_year: Option<i32>,
}

/// Split a trailing `(YYYY)` off a title.
///
/// Example: "Toy Story (1995)" -> ("Toy Story", Some(1995))
///          "Movie Title"      -> ("Movie Title", None)
///
/// Only a four-digit year at the very end counts (whitespace after it is
/// tolerated); "(1994-1998)" or a year in the middle of the title is left
/// alone. The year and the single whitespace character in front of it are
/// removed, nothing else. A year with no whitespace in front of it is still
/// read, but the title text is kept as is.
pub fn parse_title(title: &str) -> ParsedTitle {
    let Some((prefix, year)) = split_trailing_year(title.trim_end()) else {
        return ParsedTitle {
            clean_title: title.to_string(),
            release_year: None,
        };
    };

    let clean_title = match prefix.chars().next_back() {
        Some(last) if last.is_whitespace() => &prefix[..prefix.len() - last.len_utf8()],
        _ => title,
    };
    ParsedTitle {
        clean_title: clean_title.to_string(),
        release_year: Some(year),
    }
}

fn split_trailing_year(title: &str) -> Option<(&str, i32)> {
    let inner = title.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let digits = &inner[open + 1..];
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&inner[..open], digits.parse().ok()?))
}

/// Decade a year falls in: 1995 -> 1990.
///
/// Uses floored division so the result matches `(year // 10) * 10`.
pub fn decade(release_year: Option<i32>) -> Option<i32> {
    release_year.map(|year| year.div_euclid(10) * 10)
}

/// Split a pipe-delimited genre list, keeping source order.
///
/// Example: "Action|Comedy|Drama" -> ["Action", "Comedy", "Drama"]
///
/// Empty segments (from "" or "Action||Drama") are dropped; duplicates are
/// kept as the source gives them.
pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split('|')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(String::from)
        .collect()
}

/// Convert Unix seconds to a UTC timestamp.
///
/// Returns `None` for values outside chrono's representable range.
pub fn unix_to_timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

/// Build the un-enriched form of a movie: title, year, decade and genres
/// derived, lookup fields left empty.
pub fn base_movie(row: &RawMovieRow) -> EnrichedMovie {
    let ParsedTitle {
        clean_title,
        release_year,
    } = parse_title(&row.title);

    EnrichedMovie {
        movie_id: row.movie_id,
        clean_title,
        release_year,
        decade: decade(release_year),
        director: None,
        plot: None,
        box_office: None,
        genres: split_genres(&row.genres),
    }
}

/// Derive `rating_timestamp` for every rating.
///
/// Applies to the whole table; the load bound is enforced later.
pub fn transform_ratings(
    ratings: &[RawRatingRow],
) -> Result<Vec<EnrichedRating>, TransformError> {
    ratings
        .iter()
        .enumerate()
        .map(|(row, rating)| {
            let rating_timestamp = unix_to_timestamp(rating.timestamp).ok_or(
                TransformError::TimestampOutOfRange {
                    row,
                    user_id: rating.user_id,
                    timestamp: rating.timestamp,
                },
            )?;
            Ok(EnrichedRating {
                user_id: rating.user_id,
                movie_id: rating.movie_id,
                rating: rating.rating,
                rating_timestamp,
            })
        })
        .collect()
}
