use crate::error::{DetectError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// What the median filter reads for positions outside the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Out-of-range positions read as 0.0.
    #[default]
    Zero,
    /// Out-of-range positions repeat the nearest end sample.
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Median kernel width; odd values center exactly on the sample.
    pub window_size: usize,
    /// Deviations strictly above this are anomalous.
    pub threshold: f64,
    pub padding: Padding,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_THRESHOLD,
            padding: Padding::Zero,
        }
    }
}

impl DetectorConfig {
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(DetectError::InvalidWindowSize(self.window_size));
        }
        if self.threshold.is_nan() {
            return Err(DetectError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Outcome of one detection call.
///
/// `values[k]` is always `series[indices[k]]`, and indices are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection<T> {
    pub has_anomalies: bool,
    pub indices: Vec<usize>,
    pub values: Vec<T>,
}

impl<T> Detection<T> {
    pub fn empty() -> Self {
        Self {
            has_anomalies: false,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pairs of (index, value) in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter())
    }

    pub fn into_parts(self) -> (bool, Vec<usize>, Vec<T>) {
        (self.has_anomalies, self.indices, self.values)
    }
}

impl<T> Default for Detection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> FromIterator<(usize, T)> for Detection<T> {
    fn from_iter<I: IntoIterator<Item = (usize, T)>>(iter: I) -> Self {
        let (indices, values): (Vec<usize>, Vec<T>) = iter.into_iter().unzip();
        Self {
            has_anomalies: !indices.is_empty(),
            indices,
            values,
        }
    }
}

/// Per-sample diagnostics: the raw value next to its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleDeviation<T> {
    pub index: usize,
    pub value: T,
    pub baseline: f64,
    pub deviation: f64,
    pub is_anomaly: bool,
}
