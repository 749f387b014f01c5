// src/analysis/describe.rs

use crate::io::dataset::{SupplyRecord, NUMERIC_COLUMNS};
use std::fmt;

/// Summary statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for ColumnStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count {}, mean {:.2}, std {:.2}, min {:.2}, max {:.2}",
            self.count, self.mean, self.std_dev, self.min, self.max
        )
    }
}

/// Describes the finite values of a column; missing and non-finite entries are skipped.
/// Returns `None` if nothing is left. Uses the sample standard deviation (n - 1).
pub fn describe<I>(values: I) -> Option<ColumnStats>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let values: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = if count > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64
    } else {
        0.0
    };

    Some(ColumnStats {
        count,
        mean,
        std_dev: variance.sqrt(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Runs [`describe`] over every numeric column of the dataset.
///
/// Columns with no finite value are left out.
pub fn describe_columns(records: &[SupplyRecord]) -> Vec<(&'static str, ColumnStats)> {
    NUMERIC_COLUMNS
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            describe(records.iter().map(|r| r.numeric_values()[index]))
                .map(|stats| (*column, stats))
        })
        .collect()
}
