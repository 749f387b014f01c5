// src/optimization/metrics.rs

use crate::model::item::{Item, ItemId};
use crate::model::program::LinearProgram;
use serde::Serialize;

/// Positions below `-POSITION_TOLERANCE` count as a post-optimization stockout.
/// Keeps solver round-off (e.g. -1e-12) from being flagged.
pub const POSITION_TOLERANCE: f64 = 1e-6;

/// Serialized column names of [`OptimizedItem`], in field order.
pub const OPTIMIZED_TABLE_HEADER: [&str; 11] = [
    "identifier",
    "location",
    "product_type",
    "stock_level",
    "forecasted_demand",
    "optimal_reorder",
    "surplus",
    "stockout",
    "post_position",
    "pre_optimization_stockout",
    "post_optimization_stockout",
];

/// One item of the augmented table handed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedItem {
    #[serde(rename = "identifier")]
    pub id: ItemId,
    pub location: String,
    pub product_type: String,
    pub stock_level: f64,
    pub forecasted_demand: f64,
    pub optimal_reorder: f64,
    pub surplus: f64,
    pub stockout: f64,
    /// `stock_level + optimal_reorder - forecasted_demand`
    pub post_position: f64,
    #[serde(rename = "pre_optimization_stockout")]
    pub pre_stockout: bool,
    #[serde(rename = "post_optimization_stockout")]
    pub post_stockout: bool,
}

/// Aggregate stockout counts before and after optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockoutSummary {
    pub pre_optimization: usize,
    pub post_optimization: usize,
}

impl StockoutSummary {
    pub fn from_rows(rows: &[OptimizedItem]) -> Self {
        Self {
            pre_optimization: rows.iter().filter(|row| row.pre_stockout).count(),
            post_optimization: rows.iter().filter(|row| row.post_stockout).count(),
        }
    }
}

/// Stockout flag computed from the raw inputs, independent of any solve.
pub fn is_pre_optimization_stockout(item: &Item) -> bool {
    item.stock_level - item.forecasted_demand < 0.0
}

/// Joins solved variable values back onto their items.
///
/// `program` must have been built from `items` (same order) and `values` must hold
/// one entry per program variable.
pub fn extract_results(
    items: &[Item],
    program: &LinearProgram,
    values: &[f64],
) -> Vec<OptimizedItem> {
    items
        .iter()
        .zip(&program.bundles)
        .map(|(item, bundle)| {
            debug_assert_eq!(item.id, bundle.item);

            let optimal_reorder = values[bundle.reorder.0];
            let post_position = item.stock_level + optimal_reorder - item.forecasted_demand;

            OptimizedItem {
                id: item.id,
                location: item.location.clone(),
                product_type: item.product_type.clone(),
                stock_level: item.stock_level,
                forecasted_demand: item.forecasted_demand,
                optimal_reorder,
                surplus: values[bundle.surplus.0],
                stockout: values[bundle.stockout.0],
                post_position,
                pre_stockout: is_pre_optimization_stockout(item),
                post_stockout: post_position < -POSITION_TOLERANCE,
            }
        })
        .collect()
}
