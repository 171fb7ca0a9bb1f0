use thiserror::Error;

/// Errors raised while assembling a sample series from raw rows.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleError {
    #[error("Sample row {index} has {found} columns, expected {expected}")]
    RowLength {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Sample {index} has {found} channels, expected {expected}")]
    ChannelCount {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Sample {index} has a non-finite time stamp")]
    InvalidTime { index: usize },

    #[error("Sample {index} is earlier than the sample before it")]
    Unsorted { index: usize },
}
