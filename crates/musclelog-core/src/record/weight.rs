//! Bodyweight trend derived from the record store.

use serde::Serialize;

use super::{DateKey, RecordStore};

/// A trend needs at least this many samples to be drawn.
pub const MIN_TREND_SAMPLES: usize = 2;

/// Padding added below the minimum and above the maximum sample so that
/// plotted points never sit on the chart edge.
pub const PLOT_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightSample {
    pub date: DateKey,
    pub weight: f64,
}

/// Chart coordinates with the origin in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Valid bodyweight samples in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightSeries {
    samples: Vec<WeightSample>,
}

/// Parse raw weight input. Accepts anything `f64` parses after trimming, as
/// long as the result is finite; "", "abc" and "12kg" all yield `None`.
pub fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Collect every record with a numeric weight, sorted by calendar date.
///
/// Sorting compares [`DateKey`] values, which order by the parsed date, so
/// the result does not depend on string comparison of the keys.
pub fn compute_series(store: &RecordStore) -> WeightSeries {
    let mut samples: Vec<WeightSample> = store
        .iter()
        .filter_map(|record| {
            record.weight_value().map(|weight| WeightSample {
                date: record.date,
                weight,
            })
        })
        .collect();
    samples.sort_by_key(|s| s.date);
    WeightSeries { samples }
}

impl WeightSeries {
    pub fn samples(&self) -> &[WeightSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether there are enough samples to draw a trend line.
    pub fn has_trend(&self) -> bool {
        self.samples.len() >= MIN_TREND_SAMPLES
    }

    pub fn latest(&self) -> Option<&WeightSample> {
        self.samples.last()
    }

    /// Last weight minus first weight.
    pub fn change(&self) -> Option<f64> {
        if !self.has_trend() {
            return None;
        }
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some(last.weight - first.weight)
    }

    /// Plot range: sample minimum and maximum widened by [`PLOT_MARGIN`].
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.samples.iter().map(|s| s.weight);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), w| (lo.min(w), hi.max(w)));
        Some((min - PLOT_MARGIN, max + PLOT_MARGIN))
    }

    /// Map samples onto a `width` x `height` canvas.
    ///
    /// Points are spaced evenly by index, not by the number of days between
    /// samples. Returns `None` when there are too few samples for a trend,
    /// or when the weight range is too wide to represent as an `f64`.
    pub fn plot(&self, width: f64, height: f64) -> Option<Vec<PlotPoint>> {
        if !self.has_trend() {
            return None;
        }
        let (lo, hi) = self.bounds()?;
        if !(hi - lo).is_finite() {
            return None;
        }
        let step = width / (self.samples.len() - 1) as f64;
        let points = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| PlotPoint {
                x: i as f64 * step,
                y: height - (s.weight - lo) / (hi - lo) * height,
            })
            .collect();
        Some(points)
    }
}
