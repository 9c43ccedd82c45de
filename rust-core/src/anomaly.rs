//! Median-baseline anomaly detection. Pure: no state survives a call.

use crate::error::{DetectError, Result};
use crate::median::{BaselineFilter, SlidingMedian};
use crate::models::{Detection, DetectorConfig, SampleDeviation};
use tracing::debug;

/// Detect outliers with the default window (5), threshold (10) and zero padding.
pub fn detect_anomalies<T>(series: &[T]) -> Result<Detection<T>>
where
    T: Copy + Into<f64>,
{
    detect(series, &DetectorConfig::default())
}

/// Flag every sample whose distance from the sliding median exceeds
/// `config.threshold`. Series shorter than the window yield an empty result.
pub fn detect<T>(series: &[T], config: &DetectorConfig) -> Result<Detection<T>>
where
    T: Copy + Into<f64>,
{
    detect_with(series, config, &SlidingMedian::from_config(config))
}

/// Same as [`detect`], with a caller-supplied baseline primitive.
///
/// `config.padding` is ignored; the filter owns its boundary rule. The
/// short-series guard still compares against `config.window_size`, not
/// whatever width the filter uses internally.
pub fn detect_with<T, F>(series: &[T], config: &DetectorConfig, filter: &F) -> Result<Detection<T>>
where
    T: Copy + Into<f64>,
    F: BaselineFilter + ?Sized,
{
    let detection: Detection<T> = analyze_with(series, config, filter)?
        .into_iter()
        .filter(|s| s.is_anomaly)
        .map(|s| (s.index, s.value))
        .collect();

    debug!(
        samples = series.len(),
        anomalies = detection.len(),
        "anomaly scan complete"
    );
    Ok(detection)
}

/// Per-sample baseline and deviation for the whole series.
pub fn analyze<T>(series: &[T], config: &DetectorConfig) -> Result<Vec<SampleDeviation<T>>>
where
    T: Copy + Into<f64>,
{
    analyze_with(series, config, &SlidingMedian::from_config(config))
}

pub fn analyze_with<T, F>(
    series: &[T],
    config: &DetectorConfig,
    filter: &F,
) -> Result<Vec<SampleDeviation<T>>>
where
    T: Copy + Into<f64>,
    F: BaselineFilter + ?Sized,
{
    config.validate()?;
    if series.len() < config.window_size {
        debug!(
            samples = series.len(),
            window_size = config.window_size,
            "series shorter than window, skipping"
        );
        return Ok(vec![]);
    }

    let raw = finite_samples(series)?;
    let baseline = filter.baseline(&raw);
    if baseline.len() != raw.len() {
        return Err(DetectError::BaselineLength {
            expected: raw.len(),
            got: baseline.len(),
        });
    }

    Ok(series
        .iter()
        .zip(raw.iter().zip(baseline))
        .enumerate()
        .map(|(index, (&value, (&x, baseline)))| {
            let deviation = (x - baseline).abs();
            SampleDeviation {
                index,
                value,
                baseline,
                deviation,
                is_anomaly: deviation > config.threshold,
            }
        })
        .collect())
}

fn finite_samples<T>(series: &[T]) -> Result<Vec<f64>>
where
    T: Copy + Into<f64>,
{
    series
        .iter()
        .enumerate()
        .map(|(index, &v)| {
            let value: f64 = v.into();
            if value.is_finite() {
                Ok(value)
            } else {
                Err(DetectError::NonFiniteSample { index, value })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Padding;

    const SPEEDS: [i32; 15] = [60, 61, 62, 61, 59, 100, 61, 60, 62, 63, 65, 120, 64, 63, 62];

    #[test]
    fn test_speed_spikes_detected() {
        let d = detect_anomalies(&SPEEDS).unwrap();
        assert!(d.has_anomalies);
        assert_eq!(d.indices, vec![5, 11]);
        assert_eq!(d.values, vec![100, 120]);
    }

    #[test]
    fn test_speed_spikes_edge_padding() {
        let cfg = DetectorConfig::default().with_padding(Padding::Edge);
        let d = detect(&SPEEDS, &cfg).unwrap();
        assert_eq!(d.indices, vec![5, 11]);
    }

    #[test]
    fn test_flat_series() {
        let d = detect_anomalies(&[5.0, 5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_eq!(d, Detection::empty());
    }

    #[test]
    fn test_short_series_guard() {
        assert_eq!(detect_anomalies(&[1, 2, 3]).unwrap(), Detection::empty());
        assert_eq!(detect_anomalies::<f64>(&[]).unwrap(), Detection::empty());
        // guard wins even over samples that would otherwise be rejected
        assert_eq!(detect_anomalies(&[f64::NAN]).unwrap(), Detection::empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        // zero-padded W=3 baseline is all zeros: deviations 0, 10, 0
        let series = [0.0, 10.0, 0.0];
        let at = detect(&series, &DetectorConfig::new(3, 10.0)).unwrap();
        assert!(!at.has_anomalies);

        let below = detect(&series, &DetectorConfig::new(3, 9.99)).unwrap();
        assert_eq!(below.indices, vec![1]);
    }

    #[test]
    fn test_negative_threshold_flags_everything() {
        let d = detect(&[1.0, 1.0, 1.0], &DetectorConfig::new(3, -1.0)).unwrap();
        assert_eq!(d.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            detect(&[1.0, 2.0], &DetectorConfig::new(0, 1.0)),
            Err(DetectError::InvalidWindowSize(0))
        );
        assert!(matches!(
            detect(&[1.0, 2.0, 3.0], &DetectorConfig::new(3, f64::NAN)),
            Err(DetectError::InvalidThreshold(_))
        ));
        assert!(matches!(
            detect(&[1.0, f64::INFINITY, 3.0], &DetectorConfig::new(3, 1.0)),
            Err(DetectError::NonFiniteSample { index: 1, .. })
        ));
    }

    #[test]
    fn test_analyze_reports_every_sample() {
        let samples = analyze(&SPEEDS, &DetectorConfig::default()).unwrap();
        assert_eq!(samples.len(), SPEEDS.len());
        let spike = &samples[5];
        assert_eq!(spike.value, 100);
        assert_eq!(spike.baseline, 61.0);
        assert_eq!(spike.deviation, 39.0);
        assert!(spike.is_anomaly);
        assert_eq!(samples.iter().filter(|s| s.is_anomaly).count(), 2);
    }

    #[test]
    fn test_custom_filter() {
        struct Constant(f64);
        impl BaselineFilter for Constant {
            fn baseline(&self, series: &[f64]) -> Vec<f64> {
                vec![self.0; series.len()]
            }
        }

        let d = detect_with(&[1.0, 50.0, 2.0], &DetectorConfig::new(1, 10.0), &Constant(0.0)).unwrap();
        assert_eq!(d.indices, vec![1]);
        assert_eq!(d.values, vec![50.0]);
    }

    #[test]
    fn test_short_baseline_is_rejected() {
        struct Truncating;
        impl BaselineFilter for Truncating {
            fn baseline(&self, series: &[f64]) -> Vec<f64> {
                vec![0.0; series.len() - 2]
            }
        }

        let series = [1.0, 2.0, 3.0, 4.0, 50.0];
        let cfg = DetectorConfig::new(1, 10.0);
        let short = DetectError::BaselineLength { expected: 5, got: 3 };
        // the 50 at index 4 must not be dropped silently
        assert_eq!(detect_with(&series, &cfg, &Truncating), Err(short.clone()));
        assert_eq!(analyze_with(&series, &cfg, &Truncating).map(|s| s.len()), Err(short));
    }

    #[test]
    fn test_guard_follows_config_not_filter() {
        let series = [10.0, 10.0, 10.0, 90.0];
        let wide = SlidingMedian::new(7, Padding::Zero);

        // config window 3 lets a 4-sample series through to the 7-wide filter
        let d = detect_with(&series, &DetectorConfig::new(3, 10.0), &wide).unwrap();
        assert_eq!(d.indices, vec![3]);

        // config window 5 trips the guard before the filter runs
        let d = detect_with(&series, &DetectorConfig::new(5, 10.0), &wide).unwrap();
        assert_eq!(d, Detection::empty());
    }
}
