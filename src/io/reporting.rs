// src/io/reporting.rs

use crate::analysis::pareto::CostDriver;
use crate::error::Result;
use crate::optimization::engine::OptimizationRun;
use crate::optimization::metrics::{OptimizedItem, OPTIMIZED_TABLE_HEADER};
use std::fmt::Write as _;
use std::path::Path;

/// Writes the augmented item table to a CSV file.
///
/// # Arguments
/// * `path` - The path to save the file (e.g., "results/optimized.csv").
/// * `rows` - The per-item results of an optimization run.
pub fn write_optimized_table(path: &Path, rows: &[OptimizedItem]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    // serde only emits the header alongside the first record
    if rows.is_empty() {
        wtr.write_record(OPTIMIZED_TABLE_HEADER)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    log::info!("Exported {} rows to '{}'", rows.len(), path.display());
    Ok(())
}

/// Everything the summary report shows.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub locations: &'a [String],
    pub product_types: &'a [String],
    pub run: &'a OptimizationRun,
    pub cost_drivers: &'a [CostDriver],
}

/// Renders the plain-text inventory report.
pub fn render_summary_report(ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Optimized Inventory Report");
    let _ = writeln!(out, "==========================");
    let _ = writeln!(out, "Region(s): {}", ctx.locations.join(", "));
    let _ = writeln!(out, "Product Type(s): {}", ctx.product_types.join(", "));
    let _ = writeln!(
        out,
        "Pre-Optimization Stockouts: {}",
        ctx.run.summary.pre_optimization
    );
    let _ = writeln!(
        out,
        "Post-Optimization Stockouts: {}",
        ctx.run.summary.post_optimization
    );
    let _ = writeln!(
        out,
        "Total Holding + Stockout Cost: {:.2} ({} solver)",
        ctx.run.total_cost, ctx.run.solver
    );

    if !ctx.cost_drivers.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top Cost Drivers");
        let _ = writeln!(out, "{:<20} {:>14} {:>12}", "Product", "Total Costs", "Cumulative");
        for driver in ctx.cost_drivers {
            let _ = writeln!(
                out,
                "{:<20} {:>14.2} {:>11.1}%",
                driver.product_type,
                driver.total_cost,
                driver.cumulative_share * 100.0
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<16} {:<20} {:>16}", "Location", "Product", "Optimal Reorder");
    for row in &ctx.run.rows {
        let _ = writeln!(
            out,
            "{:<16} {:<20} {:>16.0}",
            row.location, row.product_type, row.optimal_reorder
        );
    }

    out
}

pub fn write_summary_report(path: &Path, ctx: &ReportContext<'_>) -> Result<()> {
    std::fs::write(path, render_summary_report(ctx))?;
    log::info!("Report written to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::ItemId;
    use crate::optimization::metrics::StockoutSummary;
    use tempfile::TempDir;

    fn sample_run() -> OptimizationRun {
        let rows = vec![
            OptimizedItem {
                id: ItemId(0),
                location: "Mumbai".to_string(),
                product_type: "haircare".to_string(),
                stock_level: 5.0,
                forecasted_demand: 20.4,
                optimal_reorder: 15.4,
                surplus: 0.0,
                stockout: 0.0,
                post_position: 0.0,
                pre_stockout: true,
                post_stockout: false,
            },
            OptimizedItem {
                id: ItemId(3),
                location: "Delhi".to_string(),
                product_type: "skincare".to_string(),
                stock_level: 30.0,
                forecasted_demand: 12.0,
                optimal_reorder: 0.0,
                surplus: 18.0,
                stockout: 0.0,
                post_position: 18.0,
                pre_stockout: false,
                post_stockout: false,
            },
        ];
        OptimizationRun {
            summary: StockoutSummary::from_rows(&rows),
            rows,
            total_cost: 36.0,
            solver: "closed-form",
        }
    }

    #[test]
    fn test_write_optimized_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("optimized.csv");
        let run = sample_run();

        write_optimized_table(&path, &run.rows).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "identifier");
        assert!(headers.iter().any(|h| h == "optimal_reorder"));
        assert!(headers.iter().any(|h| h == "post_optimization_stockout"));

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "3");
        assert_eq!(&rows[1][1], "Delhi");
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        write_optimized_table(&path, &[]).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), OPTIMIZED_TABLE_HEADER);
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn test_header_matches_serialized_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("optimized.csv");
        write_optimized_table(&path, &sample_run().rows).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), OPTIMIZED_TABLE_HEADER);
    }

    #[test]
    fn test_render_summary_report() {
        let run = sample_run();
        let locations = vec!["Delhi".to_string(), "Mumbai".to_string()];
        let product_types = vec!["haircare".to_string(), "skincare".to_string()];
        let drivers = vec![CostDriver {
            product_type: "skincare".to_string(),
            total_cost: 503.06,
            cumulative_share: 1.0,
        }];
        let ctx = ReportContext {
            locations: &locations,
            product_types: &product_types,
            run: &run,
            cost_drivers: &drivers,
        };

        let text = render_summary_report(&ctx);
        assert!(text.contains("Region(s): Delhi, Mumbai"));
        assert!(text.contains("Product Type(s): haircare, skincare"));
        assert!(text.contains("Pre-Optimization Stockouts: 1"));
        assert!(text.contains("Post-Optimization Stockouts: 0"));
        assert!(text.contains("100.0%"));
        // reorder rounded to whole units
        let mumbai = text.lines().find(|l| l.starts_with("Mumbai")).unwrap();
        assert!(mumbai.trim_end().ends_with("15"));
    }

    #[test]
    fn test_write_summary_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let run = sample_run();
        let ctx = ReportContext {
            locations: &[],
            product_types: &[],
            run: &run,
            cost_drivers: &[],
        };

        write_summary_report(&path, &ctx).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Optimized Inventory Report"));
        assert!(!text.contains("Top Cost Drivers"));
    }
}
