// src/strategy/traits.rs

use crate::error::Result;
use crate::model::program::LinearProgram;
use std::fmt::{self, Debug};

/// Terminal state reported by a solver.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The solver ran but failed (including timeouts).
    SolverError(String),
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::SolverError(message) => write!(f, "solver error ({})", message),
        }
    }
}

/// Result of one solve.
///
/// `values` holds one entry per program variable, indexed like `LinearProgram::variables`,
/// and is empty unless `status` is `Optimal`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub values: Vec<f64>,
}

impl SolveOutcome {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
        }
    }

    pub fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }
}

/// A strategy that turns a reorder program into variable values.
///
/// `Err` is reserved for problems with the solver itself (not available, or the model
/// shape is unsupported). Mathematical outcomes are reported through `SolveStatus`.
pub trait Solver: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, program: &LinearProgram) -> Result<SolveOutcome>;
}
