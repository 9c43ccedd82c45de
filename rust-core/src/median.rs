//! Centered sliding-window median, the baseline primitive behind detection.
//!
//! For a window of width `w` the kernel spans `w / 2` samples before the
//! center and `w - 1 - w / 2` after it. Odd widths are symmetric; even widths
//! lean one sample into the past and take the mean of the two middle values.
//!
//! Padding is never materialized: each window is the in-range slice plus a
//! count per padding value, and the median is found by linear-time selection,
//! so a full pass costs O(N * min(W, N)).

use crate::models::{DetectorConfig, Padding};

/// Produces a baseline for a series.
///
/// Implementations must return exactly one value per input sample.
pub trait BaselineFilter {
    fn baseline(&self, series: &[f64]) -> Vec<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingMedian {
    window: usize,
    padding: Padding,
}

impl SlidingMedian {
    /// `window` is clamped to at least 1.
    pub fn new(window: usize, padding: Padding) -> Self {
        Self {
            window: window.max(1),
            padding,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.window_size, config.padding)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Padding values and how many times each appears left and right of the slice.
    fn pads(&self, series: &[f64], left: usize, right: usize) -> [(f64, usize); 2] {
        let mut pads = match self.padding {
            Padding::Zero => [(0.0, left + right), (0.0, 0)],
            Padding::Edge => [(series[0], left), (series[series.len() - 1], right)],
        };
        pads.sort_by(|a, b| a.0.total_cmp(&b.0));
        pads
    }
}

impl BaselineFilter for SlidingMedian {
    fn baseline(&self, series: &[f64]) -> Vec<f64> {
        if series.is_empty() {
            return Vec::new();
        }

        let last = series.len() - 1;
        let before = self.window / 2;
        let after = self.window - 1 - before;
        let mut buf: Vec<f64> = Vec::with_capacity(self.window.min(series.len()));

        (0..series.len())
            .map(|center| {
                let reach = center.saturating_add(after);
                buf.clear();
                buf.extend_from_slice(&series[center.saturating_sub(before)..=reach.min(last)]);
                let pads = self.pads(series, before.saturating_sub(center), reach.saturating_sub(last));
                median_of(&mut buf, &pads, self.window)
            })
            .collect()
    }
}

/// Median of `buf` plus the padding copies; `total` is the combined count.
fn median_of(buf: &mut [f64], pads: &[(f64, usize)], total: usize) -> f64 {
    let mid = total / 2;
    if total % 2 == 1 {
        kth_smallest(buf, pads, mid)
    } else {
        (kth_smallest(buf, pads, mid - 1) + kth_smallest(buf, pads, mid)) / 2.0
    }
}

/// `k`-th smallest (0-based) of `buf` together with `pads`, which must be
/// sorted by value. Reorders `buf`.
fn kth_smallest(buf: &mut [f64], pads: &[(f64, usize)], mut k: usize) -> f64 {
    for &(value, count) in pads {
        let below = buf.iter().filter(|x| x.total_cmp(&value).is_lt()).count();
        if k < below {
            break;
        }
        let through = buf.iter().filter(|x| x.total_cmp(&value).is_le()).count() + count;
        if k < through {
            return value;
        }
        k -= count;
    }
    *buf.select_nth_unstable_by(k, f64::total_cmp).1
}
