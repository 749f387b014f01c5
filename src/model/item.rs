// src/model/item.rs

use crate::error::{OptimizerError, Result};
use serde::Serialize;
use std::fmt;

/// Stable key of an item: the 0-based data row it was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ItemId(pub usize);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the working dataset after filtering and forecasting.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    // Identity
    pub id: ItemId,

    // Grouping attributes (not used by the optimization math)
    pub location: String,
    pub product_type: String,

    // Inputs to the balance constraint
    pub stock_level: f64,
    pub forecasted_demand: f64,
}

impl Item {
    pub fn new(
        id: ItemId,
        location: impl Into<String>,
        product_type: impl Into<String>,
        stock_level: f64,
        forecasted_demand: f64,
    ) -> Self {
        Self {
            id,
            location: location.into(),
            product_type: product_type.into(),
            stock_level,
            forecasted_demand,
        }
    }

    /// Stock left over (positive) or missing (negative) if nothing is reordered.
    pub fn net_position(&self) -> f64 {
        self.stock_level - self.forecasted_demand
    }

    /// Rejects items whose numeric inputs would make the model malformed.
    pub fn validate(&self) -> Result<()> {
        if !self.stock_level.is_finite() {
            return Err(OptimizerError::InvalidItem {
                row: self.id.0,
                field: "stock_level",
                value: self.stock_level.to_string(),
            });
        }
        if !self.forecasted_demand.is_finite() {
            return Err(OptimizerError::InvalidItem {
                row: self.id.0,
                field: "forecasted_demand",
                value: self.forecasted_demand.to_string(),
            });
        }
        Ok(())
    }
}
