// src/analysis/pareto.rs

use crate::io::dataset::SupplyRecord;
use serde::Serialize;
use std::collections::HashMap;

/// One bar of the Pareto chart: a product type and its share of total cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostDriver {
    pub product_type: String,
    pub total_cost: f64,
    /// Running share of all costs, from the largest driver down to this one (0.0 - 1.0).
    pub cumulative_share: f64,
}

/// Sums `Costs` per product type and ranks the groups from most to least expensive.
///
/// Rows without a cost figure are skipped. When every cost is zero the cumulative
/// share stays at 0.0.
pub fn pareto_by_product_type(records: &[SupplyRecord]) -> Vec<CostDriver> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in records {
        if let Some(cost) = record.costs.filter(|c| c.is_finite()) {
            *totals.entry(record.product_type.as_str()).or_insert(0.0) += cost;
        }
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let grand_total: f64 = ranked.iter().map(|(_, total)| total).sum();
    let mut running = 0.0;

    ranked
        .into_iter()
        .map(|(product_type, total_cost)| {
            running += total_cost;
            CostDriver {
                product_type: product_type.to_string(),
                total_cost,
                cumulative_share: if grand_total > 0.0 {
                    running / grand_total
                } else {
                    0.0
                },
            }
        })
        .collect()
}
