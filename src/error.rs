// src/error.rs

use crate::strategy::traits::SolveStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OptimizerError>;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A row whose stock level or forecasted demand is missing or not finite.
    #[error("Invalid item at row {row}: {field} = {value}")]
    InvalidItem {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// Cost parameters must be finite and non-negative.
    #[error("Invalid cost parameter {name}: {value}")]
    InvalidCost { name: &'static str, value: f64 },

    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    #[error("Solver finished without an optimal solution: {status}")]
    NotOptimal { status: SolveStatus },

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
}

impl OptimizerError {
    /// True for errors caused by malformed inputs, raised before any solve attempt.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            OptimizerError::InvalidItem { .. } | OptimizerError::InvalidCost { .. }
        )
    }
}

impl From<toml::de::Error> for OptimizerError {
    fn from(err: toml::de::Error) -> Self {
        OptimizerError::Config(format!("TOML parse error: {}", err))
    }
}
