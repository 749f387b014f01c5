pub mod implementations;
pub mod traits;

use crate::error::{OptimizerError, Result};
use crate::optimization::config::{SolverBackend, SolverConfig};
use implementations::{ClosedFormSolver, LinearProgramSolver, LpBackend};
use traits::Solver;

/// Picks the solver strategy named in the configuration.
pub fn solver_from_config(config: &SolverConfig) -> Result<Box<dyn Solver>> {
    match config.backend {
        SolverBackend::ClosedForm => Ok(Box::new(ClosedFormSolver::new())),
        SolverBackend::Lp => Ok(Box::new(LinearProgramSolver::new(
            LpBackend::Microlp,
            config.timeout(),
            config.verbose,
        ))),
        #[cfg(feature = "cbc")]
        SolverBackend::Cbc => Ok(Box::new(LinearProgramSolver::new(
            LpBackend::Cbc,
            config.timeout(),
            config.verbose,
        ))),
        #[cfg(not(feature = "cbc"))]
        SolverBackend::Cbc => Err(OptimizerError::SolverUnavailable(
            "CBC support was not compiled in (rebuild with --features cbc)".to_string(),
        )),
    }
}
