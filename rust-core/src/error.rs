use thiserror::Error;

/// Invalid-argument failures raised before any filtering happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    /// Window must cover at least one sample
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),

    /// Threshold is not a number
    #[error("threshold must be a number, got {0}")]
    InvalidThreshold(f64),

    /// Sample is NaN or infinite
    #[error("sample at index {index} is not finite: {value}")]
    NonFiniteSample { index: usize, value: f64 },

    /// Baseline filter returned the wrong number of values
    #[error("baseline has {got} values for a series of {expected}")]
    BaselineLength { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, DetectError>;
