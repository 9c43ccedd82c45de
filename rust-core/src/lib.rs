//! Spike core: sliding-median outlier detection for numeric time series.
//! Pure functions over borrowed slices; safe to call from any thread.

mod anomaly;
mod error;
mod median;
mod models;

pub use anomaly::{analyze, analyze_with, detect, detect_anomalies, detect_with};
pub use error::{DetectError, Result};
pub use median::{BaselineFilter, SlidingMedian};
pub use models::{
    Detection, DetectorConfig, Padding, SampleDeviation, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE,
};
