// src/io/dataset.rs

use crate::error::{OptimizerError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Headers that every supply-chain file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Location", "Product type", "Stock levels"];

/// Numeric columns of the supply-chain CSV, in the order of [`SupplyRecord::numeric_values`].
pub const NUMERIC_COLUMNS: [&str; 9] = [
    "Price",
    "Number of products sold",
    "Revenue generated",
    "Stock levels",
    "Lead times",
    "Order quantities",
    "Shipping costs",
    "Costs",
    "Forecasted_Demand",
];

/// One raw row of the supply-chain CSV.
///
/// Numeric cells that are empty or unparsable load as `None`; deciding what a
/// missing value means is left to the forecasting step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplyRecord {
    /// 0-based data row in the source file.
    #[serde(skip)]
    pub row: usize,

    #[serde(rename = "Product type")]
    pub product_type: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Price", default, deserialize_with = "csv::invalid_option")]
    pub price: Option<f64>,

    #[serde(
        rename = "Number of products sold",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub units_sold: Option<f64>,

    #[serde(
        rename = "Revenue generated",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub revenue: Option<f64>,

    #[serde(rename = "Stock levels", default, deserialize_with = "csv::invalid_option")]
    pub stock_level: Option<f64>,

    #[serde(rename = "Lead times", default, deserialize_with = "csv::invalid_option")]
    pub lead_time: Option<f64>,

    #[serde(
        rename = "Order quantities",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub order_quantity: Option<f64>,

    #[serde(
        rename = "Shipping costs",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub shipping_cost: Option<f64>,

    #[serde(rename = "Costs", default, deserialize_with = "csv::invalid_option")]
    pub costs: Option<f64>,

    #[serde(
        rename = "Forecasted_Demand",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub forecasted_demand: Option<f64>,
}

impl SupplyRecord {
    /// Numeric cells labelled by [`NUMERIC_COLUMNS`].
    pub fn numeric_values(&self) -> [Option<f64>; 9] {
        [
            self.price,
            self.units_sold,
            self.revenue,
            self.stock_level,
            self.lead_time,
            self.order_quantity,
            self.shipping_cost,
            self.costs,
            self.forecasted_demand,
        ]
    }
}

/// Reads supply records from any CSV source with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<SupplyRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(OptimizerError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<SupplyRecord>().enumerate() {
        let mut record = result?;
        record.row = row;
        records.push(record);
    }
    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<SupplyRecord>> {
    let file = std::fs::File::open(path)?;
    let records = read_records(file)?;
    log::info!("Loaded {} rows from '{}'", records.len(), path.display());
    Ok(records)
}

/// Location / product-type filter. An empty list selects every value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub locations: Vec<String>,
    pub product_types: Vec<String>,
}

impl Selection {
    pub fn matches(&self, location: &str, product_type: &str) -> bool {
        let location_ok = self.locations.is_empty() || self.locations.iter().any(|l| l == location);
        let product_ok = self.product_types.is_empty()
            || self.product_types.iter().any(|p| p == product_type);
        location_ok && product_ok
    }

    /// Keeps matching records, preserving their order and row numbers.
    pub fn filter_records(&self, records: &[SupplyRecord]) -> Vec<SupplyRecord> {
        records
            .iter()
            .filter(|record| self.matches(&record.location, &record.product_type))
            .cloned()
            .collect()
    }

    /// Locations actually selected, resolving "all" against the records.
    pub fn effective_locations(&self, records: &[SupplyRecord]) -> Vec<String> {
        if self.locations.is_empty() {
            unique_values(records.iter().map(|r| r.location.as_str()))
        } else {
            self.locations.clone()
        }
    }

    pub fn effective_product_types(&self, records: &[SupplyRecord]) -> Vec<String> {
        if self.product_types.is_empty() {
            unique_values(records.iter().map(|r| r.product_type.as_str()))
        } else {
            self.product_types.clone()
        }
    }
}

fn unique_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Product type,SKU,Price,Number of products sold,Stock levels,Location,Costs,Forecasted_Demand
haircare,SKU0,69.8,802,58,Mumbai,187.75,75.5
skincare,SKU1,14.8,736,53,Mumbai,503.06,
cosmetics,SKU2,11.3,8,1,Kolkata,141.92,12
skincare,SKU3,61.1,83,,Delhi,254.77,80
";

    #[test]
    fn test_read_records() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].row, 0);
        assert_eq!(records[0].product_type, "haircare");
        assert_eq!(records[0].location, "Mumbai");
        assert_eq!(records[0].stock_level, Some(58.0));
        assert_eq!(records[0].units_sold, Some(802.0));
        assert_eq!(records[0].price, Some(69.8));
        assert_eq!(records[0].forecasted_demand, Some(75.5));
        // column absent from the file
        assert_eq!(records[0].lead_time, None);

        assert_eq!(records[1].forecasted_demand, None);
        assert_eq!(records[3].row, 3);
        assert_eq!(records[3].stock_level, None);
    }

    #[test]
    fn test_unparsable_number_loads_as_missing() {
        let data = "Location,Product type,Stock levels\nMumbai,haircare,lots\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records[0].stock_level, None);
        assert_eq!(records[0].costs, None);
    }

    #[test]
    fn test_numeric_values_follow_column_order() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        let values = records[2].numeric_values();
        let by_name = |name: &str| {
            let index = NUMERIC_COLUMNS.iter().position(|c| *c == name).unwrap();
            values[index]
        };
        assert_eq!(by_name("Price"), Some(11.3));
        assert_eq!(by_name("Stock levels"), Some(1.0));
        assert_eq!(by_name("Costs"), Some(141.92));
        assert_eq!(by_name("Forecasted_Demand"), Some(12.0));
        assert_eq!(by_name("Shipping costs"), None);
    }

    #[test]
    fn test_missing_required_column() {
        let data = "Location,Stock levels\nMumbai,3\n";
        let err = read_records(data.as_bytes()).unwrap_err();
        assert!(matches!(err, OptimizerError::MissingColumn(ref c) if c == "Product type"));
    }

    #[test]
    fn test_load_records_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_selection_filter() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();

        let all = Selection::default().filter_records(&records);
        assert_eq!(all.len(), 4);

        let selection = Selection {
            locations: vec!["Mumbai".to_string()],
            product_types: vec!["skincare".to_string()],
        };
        let filtered = selection.filter_records(&records);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].row, 1);
        assert_eq!(filtered[0].costs, Some(503.06));
    }

    #[test]
    fn test_effective_selection() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        let selection = Selection {
            locations: vec![],
            product_types: vec!["skincare".to_string()],
        };
        assert_eq!(
            selection.effective_locations(&records),
            vec!["Delhi", "Kolkata", "Mumbai"]
        );
        assert_eq!(selection.effective_product_types(&records), vec!["skincare"]);
    }
}
