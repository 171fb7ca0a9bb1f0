use thiserror::Error;

/// Errors raised by the good-time-interval algebra.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GtiError {
    #[error("Malformed interval list at index {index}: {reason}")]
    MalformedIntervals { index: usize, reason: String },

    #[error("Interval set is empty and no explicit bounds were given")]
    EmptyIntervalSet,

    #[error("No interval is equal to or longer than the chunk length {chunk_length}")]
    NoQualifyingIntervals { chunk_length: f64 },

    #[error("Invalid chunking parameters: {0}")]
    InvalidChunking(String),
}
