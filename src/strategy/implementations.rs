// src/strategy/implementations.rs

use crate::error::{OptimizerError, Result};
use crate::model::program::LinearProgram;
use crate::strategy::traits::{SolveOutcome, SolveStatus, Solver};
use good_lp::{
    constraint, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use log::{debug, info};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Solver values closer to zero than this are reported as exactly zero.
const ZERO_SNAP: f64 = 1e-9;

// =========================================================================
// 1. Closed-Form Solver (default)
// =========================================================================

/// Solves each item's one-dimensional subproblem algebraically.
///
/// With `reorder` free of cost and unbounded above, the optimum orders exactly the
/// deficit and never leaves a stockout:
/// - `reorder = max(0, demand - stock)`
/// - `surplus = max(0, stock - demand)`
/// - `stockout = 0`
///
/// Only separable programs (one balance row per item, nothing else) are accepted.
#[derive(Debug, Clone, Default)]
pub struct ClosedFormSolver;

impl ClosedFormSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for ClosedFormSolver {
    fn name(&self) -> &'static str {
        "closed-form"
    }

    fn solve(&self, program: &LinearProgram) -> Result<SolveOutcome> {
        if !program.is_separable() {
            return Err(OptimizerError::UnsupportedModel(format!(
                "closed-form solver needs one balance row per item, got {} rows for {} items",
                program.rows.len(),
                program.bundles.len()
            )));
        }
        if program.variables.iter().any(|spec| spec.cost < 0.0) {
            return Err(OptimizerError::UnsupportedModel(
                "closed-form solver needs non-negative costs".to_string(),
            ));
        }

        let mut values = vec![0.0; program.variables.len()];
        for bundle in &program.bundles {
            // rhs of the balance row is stock - demand
            let net = program.rows[bundle.balance.0].rhs;
            values[bundle.reorder.0] = (-net).max(0.0);
            values[bundle.surplus.0] = net.max(0.0);
            values[bundle.stockout.0] = 0.0;
        }

        Ok(SolveOutcome::optimal(values))
    }
}

// =========================================================================
// 2. General LP Solver (good_lp)
// =========================================================================

/// Which good_lp backend performs the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpBackend {
    /// Pure-Rust simplex, always compiled in.
    Microlp,
    /// COIN-OR CBC, linked only with the `cbc` feature.
    #[cfg(feature = "cbc")]
    Cbc,
}

/// Hands the whole program to a general LP solver.
///
/// Slower than the closed form, but it accepts coupled rows. The solve runs on a
/// worker thread so a wall-clock limit can be enforced; a timed-out solve is
/// reported as `SolveStatus::SolverError` and its thread is left to finish on its own.
#[derive(Debug, Clone)]
pub struct LinearProgramSolver {
    backend: LpBackend,
    timeout: Option<Duration>,
    verbose: bool,
}

impl LinearProgramSolver {
    pub fn new(backend: LpBackend, timeout: Option<Duration>, verbose: bool) -> Self {
        Self {
            backend,
            timeout,
            verbose,
        }
    }
}

impl Solver for LinearProgramSolver {
    fn name(&self) -> &'static str {
        match self.backend {
            LpBackend::Microlp => "lp",
            #[cfg(feature = "cbc")]
            LpBackend::Cbc => "cbc",
        }
    }

    fn solve(&self, program: &LinearProgram) -> Result<SolveOutcome> {
        if program.variables.is_empty() {
            return Ok(SolveOutcome::optimal(Vec::new()));
        }

        let started = Instant::now();
        let owned = program.clone();
        let backend = self.backend;
        let verbose = self.verbose;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("lp-solver".to_string())
            .spawn(move || {
                // The receiver may be gone after a timeout; nothing left to report to.
                let _ = tx.send(solve_with_good_lp(&owned, backend, verbose));
            })
            .map_err(|e| {
                OptimizerError::SolverUnavailable(format!("failed to launch solver thread: {}", e))
            })?;

        let received = match self.timeout {
            Some(limit) => rx.recv_timeout(limit),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let outcome = match received {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => SolveOutcome::failed(SolveStatus::SolverError(
                format!("timed out after {:?}", started.elapsed()),
            )),
            Err(RecvTimeoutError::Disconnected) => SolveOutcome::failed(
                SolveStatus::SolverError("solver thread exited without a result".to_string()),
            ),
        };

        let message = format!(
            "{} solver finished in {:?} with status {}",
            self.name(),
            started.elapsed(),
            outcome.status
        );
        if self.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
        Ok(outcome)
    }
}

/// Translates the program into good_lp and solves it on the current thread.
fn solve_with_good_lp(program: &LinearProgram, backend: LpBackend, verbose: bool) -> SolveOutcome {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = program
        .variables
        .iter()
        .map(|spec| vars.add(variable().min(spec.lower_bound)))
        .collect();

    let mut objective: Expression = 0.into();
    for (var, spec) in handles.iter().zip(&program.variables) {
        objective += *var * spec.cost;
    }

    let constraints: Vec<Constraint> = program
        .rows
        .iter()
        .map(|row| {
            let mut lhs: Expression = 0.into();
            for (index, coefficient) in &row.terms {
                lhs += handles[index.0] * *coefficient;
            }
            constraint::eq(lhs, row.rhs)
        })
        .collect();

    if verbose {
        info!(
            "Solving LP with {} variables and {} constraints",
            handles.len(),
            constraints.len()
        );
    }

    let solved = match backend {
        LpBackend::Microlp => {
            let mut model = vars
                .minimise(objective)
                .using(good_lp::solvers::microlp::microlp);
            for c in constraints {
                model = model.with(c);
            }
            model.solve().map(|solution| read_values(&solution, &handles))
        }
        #[cfg(feature = "cbc")]
        LpBackend::Cbc => {
            let mut model = vars
                .minimise(objective)
                .using(good_lp::solvers::coin_cbc::coin_cbc);
            model.set_parameter("logLevel", if verbose { "1" } else { "0" });
            for c in constraints {
                model = model.with(c);
            }
            model.solve().map(|solution| read_values(&solution, &handles))
        }
    };

    match solved {
        Ok(values) => SolveOutcome::optimal(values),
        Err(ResolutionError::Infeasible) => SolveOutcome::failed(SolveStatus::Infeasible),
        Err(ResolutionError::Unbounded) => SolveOutcome::failed(SolveStatus::Unbounded),
        Err(other) => SolveOutcome::failed(SolveStatus::SolverError(other.to_string())),
    }
}

fn read_values<S: Solution>(solution: &S, handles: &[Variable]) -> Vec<f64> {
    handles
        .iter()
        .map(|var| {
            let value = solution.value(*var);
            if value.abs() < ZERO_SNAP {
                0.0
            } else {
                value
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Item, ItemId};
    use crate::model::program::{EqualityRow, VarIndex};
    use crate::optimization::config::CostParameters;

    const TOLERANCE: f64 = 1e-6;

    fn program_for(stock: f64, demand: f64) -> LinearProgram {
        let items = vec![Item::new(ItemId(0), "Mumbai", "skincare", stock, demand)];
        LinearProgram::build(&items, &CostParameters::default())
    }

    fn lp_solver() -> LinearProgramSolver {
        LinearProgramSolver::new(LpBackend::Microlp, Some(Duration::from_secs(10)), false)
    }

    #[test]
    fn test_closed_form_deficit() {
        let outcome = ClosedFormSolver::new()
            .solve(&program_for(5.0, 20.0))
            .unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.values, vec![15.0, 0.0, 0.0]);
    }

    #[test]
    fn test_closed_form_surplus() {
        let outcome = ClosedFormSolver::new()
            .solve(&program_for(30.0, 12.0))
            .unwrap();
        assert_eq!(outcome.values, vec![0.0, 18.0, 0.0]);
    }

    #[test]
    fn test_closed_form_rejects_coupled_program() {
        let mut program = program_for(5.0, 20.0);
        program.rows.push(EqualityRow {
            terms: vec![(VarIndex(0), 1.0)],
            rhs: 4.0,
        });
        let err = ClosedFormSolver::new().solve(&program).unwrap_err();
        assert!(matches!(err, OptimizerError::UnsupportedModel(_)));
    }

    #[test]
    fn test_lp_matches_closed_form() {
        for (stock, demand) in [(5.0, 20.0), (30.0, 12.0), (10.0, 0.0), (0.0, 7.5)] {
            let program = program_for(stock, demand);
            let expected = ClosedFormSolver::new().solve(&program).unwrap();
            let actual = lp_solver().solve(&program).unwrap();

            assert_eq!(actual.status, SolveStatus::Optimal);
            for (a, e) in actual.values.iter().zip(&expected.values) {
                assert!((a - e).abs() < TOLERANCE, "stock {stock} demand {demand}: {a} != {e}");
            }
        }
    }

    #[test]
    fn test_lp_empty_program_is_optimal() {
        let outcome = lp_solver().solve(&LinearProgram::default()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.values.is_empty());
    }

    #[test]
    fn test_lp_reports_infeasible() {
        // reorder >= 0 cannot equal -1
        let mut program = program_for(5.0, 20.0);
        program.rows.push(EqualityRow {
            terms: vec![(VarIndex(0), 1.0)],
            rhs: -1.0,
        });
        let outcome = lp_solver().solve(&program).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.values.is_empty());
    }

    #[test]
    fn test_lp_reports_unbounded_for_negative_holding_cost() {
        let items = vec![Item::new(ItemId(0), "Delhi", "haircare", 5.0, 5.0)];
        let costs = CostParameters {
            holding_cost_per_unit: -1.0,
            stockout_cost_per_unit: 10.0,
        };
        let program = LinearProgram::build(&items, &costs);
        let outcome = lp_solver().solve(&program).unwrap();
        assert_eq!(outcome.status, SolveStatus::Unbounded);
    }

    #[test]
    fn test_lp_timeout_reports_solver_error() {
        let items: Vec<Item> = (0..3000)
            .map(|i| Item::new(ItemId(i), "Chennai", "cosmetics", (i % 40) as f64, 20.0))
            .collect();
        let program = LinearProgram::build(&items, &CostParameters::default());
        let solver =
            LinearProgramSolver::new(LpBackend::Microlp, Some(Duration::from_nanos(1)), false);

        let outcome = solver.solve(&program).unwrap();
        assert!(matches!(
            outcome.status,
            SolveStatus::SolverError(ref msg) if msg.contains("timed out")
        ));
        assert!(outcome.values.is_empty());
    }
}
