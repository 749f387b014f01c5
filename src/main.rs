mod analysis;
mod error;
mod io;
mod model;
mod optimization;
mod strategy;

use crate::analysis::describe::{describe, describe_columns};
use crate::analysis::missing::missing_counts;
use crate::analysis::pareto::pareto_by_product_type;
use crate::error::OptimizerError;
use crate::io::dataset::{load_records, Selection, SupplyRecord};
use crate::io::demand::{attach_forecasts, forecaster_from_config, generate_synthetic_records};
use crate::io::reporting::{self, ReportContext};
use crate::optimization::config::{OptimizerConfig, SolverBackend};
use crate::optimization::engine::InventoryOptimizer;
use crate::strategy::implementations::ClosedFormSolver;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Single-period reorder optimizer for supply-chain inventory",
    long_about = None
)]
struct Args {
    /// Supply-chain CSV to optimize
    #[arg(short, long, conflicts_with = "demo")]
    input: Option<PathBuf>,

    /// Generate N synthetic rows instead of reading a file
    #[arg(long, value_name = "N")]
    demo: Option<usize>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only optimize these locations (repeatable; default: all)
    #[arg(short, long = "location")]
    locations: Vec<String>,

    /// Only optimize these product types (repeatable; default: all)
    #[arg(short, long = "product-type")]
    product_types: Vec<String>,

    /// Where to write the optimized table
    #[arg(short, long, default_value = "optimized_inventory.csv")]
    output: PathBuf,

    /// Where to write the text report
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Cost per unit left over after demand (overrides the config)
    #[arg(long)]
    holding_cost: Option<f64>,

    /// Cost per unit of unmet demand (overrides the config)
    #[arg(long)]
    stockout_cost: Option<f64>,

    /// closed-form, lp or cbc
    #[arg(long)]
    solver: Option<SolverBackend>,

    /// Wall-clock limit for the LP solver in seconds; 0 disables it
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log solver progress at info level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Loads the config file (if any) and applies command-line overrides.
    fn resolve_config(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => OptimizerConfig::load_from_file(path)?,
            None => OptimizerConfig::default(),
        };

        if let Some(cost) = self.holding_cost {
            config.costs.holding_cost_per_unit = cost;
        }
        if let Some(cost) = self.stockout_cost {
            config.costs.stockout_cost_per_unit = cost;
        }
        if let Some(backend) = self.solver {
            config.solver.backend = backend;
        }
        if let Some(timeout) = self.timeout_secs {
            config.solver.timeout_secs = timeout;
        }
        config.solver.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }

    fn load_dataset(&self) -> Result<Vec<SupplyRecord>> {
        match (&self.input, self.demo) {
            (Some(path), _) => load_records(path)
                .with_context(|| format!("failed to load dataset '{}'", path.display())),
            (None, Some(rows)) => {
                info!("Generating {} synthetic rows", rows);
                Ok(generate_synthetic_records(rows, 50.0, 15.0)?)
            }
            (None, None) => bail!("either --input or --demo must be given"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // 1. CONFIGURATION
    let config = args.resolve_config()?;
    info!(
        "Costs: holding {:.2}/unit, stockout {:.2}/unit; solver {}",
        config.costs.holding_cost_per_unit,
        config.costs.stockout_cost_per_unit,
        config.solver.backend
    );

    // 2. INGESTION
    let records = args.load_dataset()?;

    // 3. EXPLORATORY SUMMARY
    for (column, stats) in describe_columns(&records) {
        info!("{}: {}", column, stats);
    }
    for count in missing_counts(&records).iter().filter(|c| c.missing > 0) {
        warn!("{}: {} of {} rows missing", count.column, count.missing, records.len());
    }
    let cost_drivers = pareto_by_product_type(&records);
    for driver in &cost_drivers {
        info!(
            "Cost driver {}: {:.2} ({:.1}% cumulative)",
            driver.product_type,
            driver.total_cost,
            driver.cumulative_share * 100.0
        );
    }

    // 4. FILTER & FORECAST
    let selection = Selection {
        locations: args.locations.clone(),
        product_types: args.product_types.clone(),
    };
    let selected = selection.filter_records(&records);
    if selected.is_empty() {
        warn!("No rows match the selected locations and product types");
    }
    let forecaster = forecaster_from_config(&config.forecast);
    let items = attach_forecasts(&selected, forecaster.as_ref())?;
    if let Some(stats) = describe(items.iter().map(|i| Some(i.forecasted_demand))) {
        info!("Forecasted demand: {}", stats);
    }

    // 5. OPTIMIZE
    let optimizer = match InventoryOptimizer::from_config(&config) {
        Ok(optimizer) => optimizer,
        Err(OptimizerError::SolverUnavailable(reason)) => {
            warn!("{}; falling back to the closed-form solver", reason);
            InventoryOptimizer::new(config.costs.clone(), Box::new(ClosedFormSolver::new()))
        }
        Err(e) => return Err(e.into()),
    };
    let run = optimizer.optimize(&items).inspect_err(|e| {
        if e.is_input_error() {
            error!("Input rejected before solving: {}", e);
        }
    })?;
    info!("Pre-Optimization Stockouts: {}", run.summary.pre_optimization);
    info!("Post-Optimization Stockouts: {}", run.summary.post_optimization);

    // 6. EXPORT
    reporting::write_optimized_table(&args.output, &run.rows)?;
    if let Some(path) = &args.report {
        let locations = selection.effective_locations(&records);
        let product_types = selection.effective_product_types(&records);
        let ctx = ReportContext {
            locations: &locations,
            product_types: &product_types,
            run: &run,
            cost_drivers: &cost_drivers,
        };
        reporting::write_summary_report(path, &ctx)?;
    }

    Ok(())
}
