//! Per-field statistics over one generation batch.
//!
//! Computed once per call from the active records, then treated as
//! read-only by every downstream stage.

use crate::error::ArtError;
use crate::record::IrisRecord;

/// Observed statistics for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl FieldStats {
    fn from_values(values: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
            sum += v;
        }
        let mean = sum / values.len() as f64;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
        FieldStats {
            min,
            max,
            mean,
            std_dev: var.sqrt(),
        }
    }

    /// A zero-variance field; normalization collapses it to a constant.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Statistics for all four numeric fields, plus the derived color ratio
/// (`sepal_length / sepal_width`) used by the palette index policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub sepal_length: FieldStats,
    pub sepal_width: FieldStats,
    pub petal_length: FieldStats,
    pub petal_width: FieldStats,
    pub color_ratio: FieldStats,
}

impl DatasetStats {
    /// Aggregate over a non-empty batch. Side-effect free; fails with
    /// `EmptyDataset` when given zero records so that downstream stages
    /// never see an undefined range.
    pub fn aggregate(records: &[IrisRecord]) -> Result<Self, ArtError> {
        if records.is_empty() {
            return Err(ArtError::EmptyDataset);
        }

        let collect = |f: fn(&IrisRecord) -> f64| -> Vec<f64> { records.iter().map(f).collect() };

        Ok(DatasetStats {
            sepal_length: FieldStats::from_values(&collect(|r| r.sepal_length)),
            sepal_width: FieldStats::from_values(&collect(|r| r.sepal_width)),
            petal_length: FieldStats::from_values(&collect(|r| r.petal_length)),
            petal_width: FieldStats::from_values(&collect(|r| r.petal_width)),
            color_ratio: FieldStats::from_values(&collect(|r| color_ratio(r))),
        })
    }
}

/// Ratio of the two sepal fields; drives deterministic palette indexing.
pub fn color_ratio(record: &IrisRecord) -> f64 {
    if record.sepal_width > 0.0 {
        record.sepal_length / record.sepal_width
    } else {
        0.0
    }
}

/// Equal-count bin edges: `bins + 1` values taken from the sorted data at
/// evenly spaced ranks. Duplicate edges are permitted when the data has
/// heavy ties; binning handles them by half-open intervals.
pub fn quantile_edges(values: &[f64], bins: usize) -> Vec<f64> {
    if values.is_empty() {
        return vec![0.0; bins + 1];
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    (0..=bins)
        .map(|j| {
            let rank = (j as f64 * (n - 1) as f64 / bins as f64).round() as usize;
            sorted[rank]
        })
        .collect()
}

/// Index of the bin containing `value` given edges from `quantile_edges`.
/// Intervals are half-open except the last, which is closed at the top.
pub fn bin_index(value: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    for b in 0..bins {
        if value < edges[b + 1] {
            return b;
        }
    }
    bins - 1
}
