//! Errors raised by the transform stage.

use data_loader::UserId;
use thiserror::Error;

/// Transform failures are fatal for the run.
#[derive(Error, Debug)]
pub enum TransformError {
    /// A rating's Unix timestamp can't be represented as a calendar timestamp
    #[error("rating #{row} (user {user_id}) has out-of-range timestamp {timestamp}")]
    TimestampOutOfRange {
        row: usize,
        user_id: UserId,
        timestamp: i64,
    },
}
