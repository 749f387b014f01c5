// src/optimization/engine.rs

use crate::error::{OptimizerError, Result};
use crate::model::item::Item;
use crate::model::program::LinearProgram;
use crate::optimization::config::{CostParameters, OptimizerConfig};
use crate::optimization::metrics::{
    extract_results, OptimizedItem, StockoutSummary, POSITION_TOLERANCE,
};
use crate::strategy::solver_from_config;
use crate::strategy::traits::{SolveStatus, Solver};
use log::{debug, info, warn};

/// Output of one optimization run over a filtered item set.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRun {
    pub rows: Vec<OptimizedItem>,
    pub summary: StockoutSummary,
    /// Objective value: total holding plus stockout cost.
    pub total_cost: f64,
    pub solver: &'static str,
}

/// Builds and solves a fresh reorder program for every call.
///
/// Holds no state between runs, so a changed filter or forecast only needs another
/// call to `optimize`.
#[derive(Debug)]
pub struct InventoryOptimizer {
    costs: CostParameters,
    solver: Box<dyn Solver>,
}

impl InventoryOptimizer {
    pub fn new(costs: CostParameters, solver: Box<dyn Solver>) -> Self {
        Self { costs, solver }
    }

    pub fn from_config(config: &OptimizerConfig) -> Result<Self> {
        let solver = solver_from_config(&config.solver)?;
        Ok(Self::new(config.costs.clone(), solver))
    }

    /// Runs the whole pipeline: validate, build, solve, extract.
    ///
    /// Any failure aborts the run for the entire item set; no partial results are
    /// returned.
    pub fn optimize(&self, items: &[Item]) -> Result<OptimizationRun> {
        // =================================================================
        // PHASE 1: VALIDATE (before any solve attempt)
        // =================================================================
        self.costs.validate()?;
        for item in items {
            item.validate()?;
            if item.stock_level < 0.0 {
                warn!(
                    "Item {} ({} / {}) has negative stock {:.2}",
                    item.id, item.location, item.product_type, item.stock_level
                );
            }
        }

        // =================================================================
        // PHASE 2: BUILD & SOLVE
        // =================================================================
        let program = LinearProgram::build(items, &self.costs);
        debug!(
            "Built program with {} variables and {} balance rows",
            program.variables.len(),
            program.rows.len()
        );

        let outcome = self.solver.solve(&program)?;
        if outcome.status != SolveStatus::Optimal {
            return Err(OptimizerError::NotOptimal {
                status: outcome.status,
            });
        }
        if outcome.values.len() != program.variables.len() {
            return Err(OptimizerError::NotOptimal {
                status: SolveStatus::SolverError(format!(
                    "solver returned {} values for {} variables",
                    outcome.values.len(),
                    program.variables.len()
                )),
            });
        }
        if let Some(bundle) = program.bundles.iter().find(|bundle| {
            let residual = program.row_residual(bundle.balance, &outcome.values);
            residual.is_nan() || residual.abs() > POSITION_TOLERANCE
        }) {
            return Err(OptimizerError::NotOptimal {
                status: SolveStatus::SolverError(format!(
                    "balance row of item {} is violated",
                    bundle.item
                )),
            });
        }

        // =================================================================
        // PHASE 3: EXTRACT
        // =================================================================
        let rows = extract_results(items, &program, &outcome.values);
        let summary = StockoutSummary::from_rows(&rows);
        let total_cost = program.objective_value(&outcome.values);

        if summary.post_optimization > 0 && self.costs.stockout_cost_per_unit > 0.0 {
            warn!(
                "{} items still stocked out after optimization; check the solver output",
                summary.post_optimization
            );
        }

        info!(
            "Optimized {} items with {} solver: stockouts {} -> {}, cost {:.2}",
            rows.len(),
            self.solver.name(),
            summary.pre_optimization,
            summary.post_optimization,
            total_cost
        );

        Ok(OptimizationRun {
            rows,
            summary,
            total_cost,
            solver: self.solver.name(),
        })
    }
}
