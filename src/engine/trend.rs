//! Lab trend analysis: direction and bounded trend multiplier.
//!
//! Both computations look only at the most recent `TREND_WINDOW` points
//! after sorting by timestamp, so callers may pass an unsorted history.

use chrono::{DateTime, Utc};

use crate::models::enums::{LabType, TrendDirection};
use crate::models::LabResult;

/// Number of most recent points considered.
pub const TREND_WINDOW: usize = 5;

/// Absolute OLS slope (value units per sample) above which a series is
/// classified as rising or falling.
pub const SLOPE_THRESHOLD: f64 = 0.05;

pub const MIN_TREND_FACTOR: f64 = 1.0;
pub const MAX_TREND_FACTOR: f64 = 2.0;

/// A single timestamped lab value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabPoint {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl LabPoint {
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

impl From<&LabResult> for LabPoint {
    fn from(lab: &LabResult) -> Self {
        Self {
            value: lab.value,
            timestamp: lab.timestamp,
        }
    }
}

/// Extract the series for one lab type, preserving input order.
pub fn series_for(labs: &[LabResult], lab_type: LabType) -> Vec<LabPoint> {
    labs.iter()
        .filter(|l| l.lab_type == lab_type)
        .map(LabPoint::from)
        .collect()
}

/// Most recent lab of the given type. Ties on timestamp resolve to the
/// later-inserted record.
pub fn latest_lab(labs: &[LabResult], lab_type: LabType) -> Option<&LabResult> {
    labs.iter()
        .filter(|l| l.lab_type == lab_type)
        .max_by_key(|l| l.timestamp)
}

pub fn latest_value(labs: &[LabResult], lab_type: LabType) -> Option<f64> {
    latest_lab(labs, lab_type).map(|l| l.value)
}

/// Sorted ascending by timestamp, truncated to the last `TREND_WINDOW` points.
fn recent_window(points: &[LabPoint]) -> Vec<LabPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.timestamp);
    let skip = sorted.len().saturating_sub(TREND_WINDOW);
    sorted.split_off(skip)
}

/// Classify the direction of a lab series.
pub fn compute_trend(points: &[LabPoint]) -> TrendDirection {
    if points.len() < 2 {
        return TrendDirection::Stable;
    }

    let recent = recent_window(points);
    let values: Vec<f64> = recent.iter().map(|p| p.value).collect();
    let slope = linear_slope(&values);

    if slope > SLOPE_THRESHOLD {
        TrendDirection::Rising
    } else if slope < -SLOPE_THRESHOLD {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    }
}

/// Map the relative change across the recent window into `[1.0, 2.0]`.
///
/// 0% change (or any decrease) gives 1.0; a doubling or more gives 2.0.
/// A window starting at zero cannot express a relative change and yields 1.0.
pub fn compute_trend_factor(points: &[LabPoint]) -> f64 {
    if points.len() < 2 {
        return MIN_TREND_FACTOR;
    }

    let recent = recent_window(points);
    let (first, last) = match (recent.first(), recent.last()) {
        (Some(f), Some(l)) => (f.value, l.value),
        _ => return MIN_TREND_FACTOR,
    };

    if first == 0.0 {
        return MIN_TREND_FACTOR;
    }

    let relative_change = (last - first) / first;
    if !relative_change.is_finite() {
        return MIN_TREND_FACTOR;
    }

    (1.0 + relative_change).clamp(MIN_TREND_FACTOR, MAX_TREND_FACTOR)
}

/// Ordinary least-squares slope of `values` against x = 0..n-1.
fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / denom
}
