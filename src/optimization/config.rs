// src/optimization/config.rs

use crate::error::{OptimizerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Per-unit cost weights of the objective.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CostParameters {
    /// Cost of one unit of surplus inventory.
    pub holding_cost_per_unit: f64,
    /// Cost of one unit of unmet demand.
    pub stockout_cost_per_unit: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            holding_cost_per_unit: 2.0,
            stockout_cost_per_unit: 10.0,
        }
    }
}

impl CostParameters {
    /// Both costs must be finite and non-negative, otherwise the program may be unbounded.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("holding_cost_per_unit", self.holding_cost_per_unit),
            ("stockout_cost_per_unit", self.stockout_cost_per_unit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizerError::InvalidCost { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverBackend {
    /// Per-item algebraic optimum, no LP solver involved.
    #[default]
    ClosedForm,
    /// Pure-Rust simplex through good_lp.
    Lp,
    /// COIN-OR CBC through good_lp (requires the `cbc` feature).
    Cbc,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverBackend::ClosedForm => "closed-form",
            SolverBackend::Lp => "lp",
            SolverBackend::Cbc => "cbc",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed-form" | "closed_form" => Ok(SolverBackend::ClosedForm),
            "lp" => Ok(SolverBackend::Lp),
            "cbc" => Ok(SolverBackend::Cbc),
            other => Err(format!(
                "unknown solver '{}': expected 'closed-form', 'lp' or 'cbc'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit for LP backends, in seconds. 0 disables the limit.
    pub timeout_secs: u64,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::ClosedForm,
            timeout_secs: 30,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastSource {
    /// Use the `Forecasted_Demand` column produced by an upstream model.
    #[default]
    Recorded,
    /// Units sold scaled by `multiplier`.
    SalesRunRate,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub source: ForecastSource,
    pub multiplier: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            source: ForecastSource::Recorded,
            multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub costs: CostParameters,
    pub solver: SolverConfig,
    pub forecast: ForecastConfig,
}

impl OptimizerConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OptimizerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: OptimizerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.costs.validate()?;

        let multiplier = self.forecast.multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(OptimizerError::Config(format!(
                "forecast multiplier must be a non-negative number, got {}",
                multiplier
            )));
        }
        Ok(())
    }
}
