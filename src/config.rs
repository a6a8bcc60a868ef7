use serde::{Deserialize, Serialize};

use crate::solver::ScipSettings;

/// Configuration of a cutting stock run
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CuttingConfig {
    /// Column generation stops once the best reduced cost is at least `-reduced_cost_tolerance`
    pub reduced_cost_tolerance: f64,
    /// Maximum distance of an integer variable's value to the nearest integer before a warning
    /// is emitted
    pub integrality_tolerance: f64,
    /// Slack allowed when checking that a pattern fits on a board
    pub feasibility_tolerance: f64,
    /// Upper bound on the number of column generation iterations
    pub max_iterations: usize,
    /// Time limit per individual solve, in seconds. If undefined, solves are not limited
    pub time_limit: Option<f64>,
    /// Show the solver's own log output
    pub solver_output: bool,
}

impl Default for CuttingConfig {
    fn default() -> Self {
        Self {
            reduced_cost_tolerance: 1e-3,
            integrality_tolerance: 1e-6,
            feasibility_tolerance: 1e-9,
            max_iterations: 10_000,
            time_limit: None,
            solver_output: false,
        }
    }
}

impl CuttingConfig {
    /// Settings for the SCIP backend derived from this configuration.
    pub fn scip_settings(&self) -> ScipSettings {
        ScipSettings {
            time_limit: self.time_limit,
            show_output: self.solver_output,
        }
    }
}
