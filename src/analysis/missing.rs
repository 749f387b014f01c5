// src/analysis/missing.rs

use crate::io::dataset::{SupplyRecord, NUMERIC_COLUMNS};

/// Number of rows with no usable value in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingCount {
    pub column: &'static str,
    pub missing: usize,
}

/// Counts empty cells per column, text columns first and then [`NUMERIC_COLUMNS`].
///
/// A numeric cell is missing when it is absent, unparsable or not finite; a text
/// cell when it is blank.
pub fn missing_counts(records: &[SupplyRecord]) -> Vec<MissingCount> {
    let mut counts = vec![
        MissingCount {
            column: "Product type",
            missing: records
                .iter()
                .filter(|r| r.product_type.trim().is_empty())
                .count(),
        },
        MissingCount {
            column: "Location",
            missing: records
                .iter()
                .filter(|r| r.location.trim().is_empty())
                .count(),
        },
    ];

    let mut numeric = [0usize; NUMERIC_COLUMNS.len()];
    for record in records {
        for (slot, value) in numeric.iter_mut().zip(record.numeric_values()) {
            if !value.is_some_and(f64::is_finite) {
                *slot += 1;
            }
        }
    }
    counts.extend(
        NUMERIC_COLUMNS
            .iter()
            .zip(numeric)
            .map(|(&column, missing)| MissingCount { column, missing }),
    );
    counts
}
