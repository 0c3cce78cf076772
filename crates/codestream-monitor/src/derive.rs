//! Derived metrics over raw counter samples
//!
//! Every function here is pure and recomputed per render request. Nothing
//! is cached or mutated in place, so a render during ongoing sampling sees
//! a consistent (if slightly stale) view.
//!
//! Degenerate inputs have defined results: the average of an empty series
//! is `0`, and every rate computation floors its divisor at `1`.

use crate::samples::Sample;
use serde::Serialize;

/// One chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// Per-sample deltas against the previous value, with a zero baseline for
/// the first sample. A transient counter decrease clamps to zero rather
/// than producing a negative rate.
pub fn deltas(values: &[u64]) -> Vec<u64> {
    let mut prev = 0u64;
    values
        .iter()
        .map(|&v| {
            let delta = v.saturating_sub(prev);
            prev = v;
            delta
        })
        .collect()
}

/// Milliseconds spent per new unit for each sample: interval divided by the
/// delta, divisor floored at 1. X is the counter value at the sample.
///
/// The interval baseline for the first sample is sampler start, so the
/// first point reflects startup skew; dashboards flag it and
/// [`average_excluding_first`] leaves it out.
pub fn time_per_unit(samples: &[Sample]) -> Vec<Point> {
    let mut prev_offset = 0u64;
    let mut prev_value = 0u64;
    samples
        .iter()
        .map(|s| {
            let interval = s.offset_ms.saturating_sub(prev_offset);
            let delta = s.value.saturating_sub(prev_value);
            prev_offset = s.offset_ms;
            prev_value = s.value;
            Point {
                x: s.value as f64,
                y: interval as f64 / delta.max(1) as f64,
            }
        })
        .collect()
}

/// Counter value over time: `(seconds since sampler start, value)`
pub fn growth_points(samples: &[Sample]) -> Vec<Point> {
    samples
        .iter()
        .map(|s| Point {
            x: s.offset_ms as f64 / 1000.0,
            y: s.value as f64,
        })
        .collect()
}

/// New units per poll interval over time
pub fn per_interval_points(samples: &[Sample]) -> Vec<Point> {
    let values: Vec<u64> = samples.iter().map(|s| s.value).collect();
    samples
        .iter()
        .zip(deltas(&values))
        .map(|(s, delta)| Point {
            x: s.offset_ms as f64 / 1000.0,
            y: delta as f64,
        })
        .collect()
}

/// New clones per interval plotted against the candidate count read in the
/// same tick. The two series are appended in lockstep by the sampler; any
/// length mismatch truncates to the shorter one.
pub fn expansion_points(clones: &[Sample], candidates: &[Sample]) -> Vec<Point> {
    let clone_values: Vec<u64> = clones.iter().map(|s| s.value).collect();
    deltas(&clone_values)
        .into_iter()
        .zip(candidates)
        .map(|(new_clones, candidate)| Point {
            x: candidate.value as f64,
            y: new_clones as f64,
        })
        .collect()
}

/// Arithmetic mean; the empty series averages to `0`
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the Y values, skipping the startup-skewed first point
pub fn average_excluding_first(points: &[Point]) -> f64 {
    let tail: Vec<f64> = points.iter().skip(1).map(|p| p.y).collect();
    average(&tail)
}

/// Windowed running averages over a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningAverages {
    /// Mean over the full series
    pub overall: f64,
    /// Mean over the last 100 entries
    pub last_100: f64,
    /// Mean over the last 1000 entries
    pub last_1000: f64,
}

/// Compute all-time, last-100, and last-1000 averages
pub fn running_averages(values: &[f64]) -> RunningAverages {
    let tail = |n: usize| &values[values.len().saturating_sub(n)..];
    RunningAverages {
        overall: average(values),
        last_100: average(tail(100)),
        last_1000: average(tail(1000)),
    }
}

/// Per-line normalization of a run timing, divisor floored at 1
pub fn normalize_per_line(time_ms: f64, line_count: u64) -> f64 {
    time_ms / line_count.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_with_zero_baseline() {
        assert_eq!(deltas(&[0, 5, 12, 12, 20]), vec![0, 5, 7, 0, 8]);
    }

    #[test]
    fn test_deltas_clamp_counter_regression() {
        assert_eq!(deltas(&[10, 8, 12]), vec![10, 0, 4]);
    }

    #[test]
    fn test_time_per_unit_zero_delta_uses_divisor_one() {
        let samples = [Sample::new(1000, 10), Sample::new(2000, 10)];
        let points = time_per_unit(&samples);
        assert_eq!(points[1].y, 1000.0);
        assert_eq!(points[1].x, 10.0);
    }

    #[test]
    fn test_time_per_unit_first_point_uses_start_baseline() {
        let points = time_per_unit(&[Sample::new(3000, 6)]);
        assert_eq!(points[0].y, 500.0);
    }

    #[test]
    fn test_average_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[2.0, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn test_average_excluding_first() {
        let points = [
            Point { x: 0.0, y: 900.0 },
            Point { x: 1.0, y: 10.0 },
            Point { x: 2.0, y: 20.0 },
        ];
        assert_eq!(average_excluding_first(&points), 15.0);
        assert_eq!(average_excluding_first(&points[..1]), 0.0);
        assert_eq!(average_excluding_first(&[]), 0.0);
    }

    #[test]
    fn test_running_averages_windows() {
        let values: Vec<f64> = (1..=200).map(|v| v as f64).collect();
        let avgs = running_averages(&values);
        assert_eq!(avgs.overall, 100.5);
        assert_eq!(avgs.last_100, 150.5); // mean of 101..=200
        assert_eq!(avgs.last_1000, 100.5); // window larger than series
    }

    #[test]
    fn test_growth_and_interval_points() {
        let samples = [Sample::new(1000, 4), Sample::new(2000, 10)];
        let growth = growth_points(&samples);
        assert_eq!(growth[1], Point { x: 2.0, y: 10.0 });

        let per_interval = per_interval_points(&samples);
        assert_eq!(per_interval[0].y, 4.0);
        assert_eq!(per_interval[1].y, 6.0);
    }

    #[test]
    fn test_expansion_points_pair_series() {
        let clones = [Sample::new(1000, 3), Sample::new(2000, 7)];
        let candidates = [Sample::new(1000, 5), Sample::new(2000, 9)];
        let points = expansion_points(&clones, &candidates);
        assert_eq!(points[0], Point { x: 5.0, y: 3.0 });
        assert_eq!(points[1], Point { x: 9.0, y: 4.0 });
    }

    #[test]
    fn test_expansion_points_truncate_to_shorter() {
        let clones = [Sample::new(1000, 3), Sample::new(2000, 7)];
        let candidates = [Sample::new(1000, 5)];
        assert_eq!(expansion_points(&clones, &candidates).len(), 1);
    }

    #[test]
    fn test_normalize_per_line() {
        assert_eq!(normalize_per_line(100.0, 50), 2.0);
        assert_eq!(normalize_per_line(100.0, 0), 100.0);
    }
}
