// src/io/demand.rs

use crate::error::{OptimizerError, Result};
use crate::io::dataset::SupplyRecord;
use crate::model::item::{Item, ItemId};
use crate::optimization::config::{ForecastConfig, ForecastSource};
use rand::{thread_rng, Rng};
use rand_distr::{Distribution, Normal};
use std::fmt::Debug;

// =========================================================================
// Forecasters
// =========================================================================

/// Supplies one forecasted-demand value per record. Treated as an opaque oracle.
pub trait DemandForecaster: Debug {
    fn forecast(&self, record: &SupplyRecord) -> Option<f64>;
}

/// Reads the `Forecasted_Demand` column written by an upstream model.
#[derive(Debug, Clone, Default)]
pub struct RecordedForecast;

impl DemandForecaster for RecordedForecast {
    fn forecast(&self, record: &SupplyRecord) -> Option<f64> {
        record.forecasted_demand
    }
}

/// Projects demand from historical units sold.
#[derive(Debug, Clone)]
pub struct SalesRunRate {
    pub multiplier: f64,
}

impl DemandForecaster for SalesRunRate {
    fn forecast(&self, record: &SupplyRecord) -> Option<f64> {
        record.units_sold.map(|sold| sold * self.multiplier)
    }
}

pub fn forecaster_from_config(config: &ForecastConfig) -> Box<dyn DemandForecaster> {
    match config.source {
        ForecastSource::Recorded => Box::new(RecordedForecast),
        ForecastSource::SalesRunRate => Box::new(SalesRunRate {
            multiplier: config.multiplier,
        }),
    }
}

/// Turns raw records into optimizer items.
///
/// A row with a missing or non-finite stock level or forecast fails the whole batch.
/// Negative forecasts are clamped to zero.
pub fn attach_forecasts(
    records: &[SupplyRecord],
    forecaster: &dyn DemandForecaster,
) -> Result<Vec<Item>> {
    records
        .iter()
        .map(|record| {
            let stock_level = record.stock_level.ok_or_else(|| OptimizerError::InvalidItem {
                row: record.row,
                field: "stock_level",
                value: "missing".to_string(),
            })?;
            let demand = forecaster
                .forecast(record)
                .ok_or_else(|| OptimizerError::InvalidItem {
                    row: record.row,
                    field: "forecasted_demand",
                    value: "missing".to_string(),
                })?;

            let item = Item::new(
                ItemId(record.row),
                record.location.clone(),
                record.product_type.clone(),
                stock_level,
                if demand < 0.0 { 0.0 } else { demand },
            );
            item.validate()?;
            Ok(item)
        })
        .collect()
}

// =========================================================================
// Synthetic data
// =========================================================================

const DEMO_LOCATIONS: [&str; 5] = ["Mumbai", "Kolkata", "Delhi", "Bangalore", "Chennai"];
const DEMO_PRODUCT_TYPES: [&str; 3] = ["haircare", "skincare", "cosmetics"];

/// Generates a demo dataset with Normal-distributed stock, sales and forecasts.
///
/// # Arguments
/// * `rows` - Number of records.
/// * `mean_demand` - Average forecasted demand (e.g., 50.0).
/// * `std_dev` - Volatility of demand and stock (e.g., 15.0).
///
/// Fails with a configuration error when the distribution cannot be built
/// (non-finite mean or deviation).
pub fn generate_synthetic_records(
    rows: usize,
    mean_demand: f64,
    std_dev: f64,
) -> Result<Vec<SupplyRecord>> {
    let invalid = |reason: String| {
        OptimizerError::Config(format!(
            "cannot sample demand from N({}, {}): {}",
            mean_demand, std_dev, reason
        ))
    };
    if !mean_demand.is_finite() {
        return Err(invalid("mean is not finite".to_string()));
    }
    let normal = Normal::new(mean_demand, std_dev.abs()).map_err(|e| invalid(e.to_string()))?;
    let mut rng = thread_rng();

    let records = (0..rows)
        .map(|row| {
            // Clamp negatives to 0: neither stock nor demand can be negative.
            let demand = normal.sample(&mut rng).round().max(0.0);
            let stock = normal.sample(&mut rng).round().max(0.0);
            let sold = (demand * rng.gen_range(0.8..1.2_f64)).round();
            let price = (rng.gen_range(1.0..100.0_f64) * 100.0).round() / 100.0;

            SupplyRecord {
                row,
                product_type: DEMO_PRODUCT_TYPES[rng.gen_range(0..DEMO_PRODUCT_TYPES.len())]
                    .to_string(),
                location: DEMO_LOCATIONS[rng.gen_range(0..DEMO_LOCATIONS.len())].to_string(),
                price: Some(price),
                units_sold: Some(sold),
                revenue: Some((price * sold * 100.0).round() / 100.0),
                stock_level: Some(stock),
                lead_time: Some(rng.gen_range(1..=30) as f64),
                order_quantity: Some(rng.gen_range(1..=100) as f64),
                shipping_cost: Some((rng.gen_range(1.0..10.0_f64) * 100.0).round() / 100.0),
                costs: Some((rng.gen_range(100.0..1000.0_f64) * 100.0).round() / 100.0),
                forecasted_demand: Some(demand),
            }
        })
        .collect();
    Ok(records)
}
