//! Pricing: find the pattern whose column would improve the restricted master the most.
//!
//! For dual prices `pi`, the reduced cost of a pattern `p` is `1 - sum_i pi_i * p_i`. The most
//! negative one over all patterns that fit on a board is found with the integer knapsack
//!
//! ```text
//!   max  sum_i pi_i * y_i
//!   s.t. sum_i w_i * y_i <= W,   y_i >= 0 integer
//! ```
//!
//! whose feasible set is exactly the set of all cutting patterns.

use log::{debug, warn};

use crate::error::{CutError, Result, Stage};
use crate::instance::Instance;
use crate::lp::{LinearProgram, Sense, SolveStatus, cons, var};
use crate::pattern::Pattern;
use crate::solver::{SolveError, Solver};

/// Best pattern for a set of dual prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    /// `1 - value of the knapsack`; negative means the pattern improves the master.
    pub reduced_cost: f64,
    pub pattern: Pattern,
}

impl PricingResult {
    /// Whether adding `pattern` can lower the master's objective by more than `tolerance`.
    pub fn improves(&self, tolerance: f64) -> bool {
        self.reduced_cost < -tolerance
    }
}

/// Reduced cost of an arbitrary pattern for the given dual prices.
pub fn reduced_cost(pattern: &Pattern, duals: &[f64]) -> f64 {
    1.0 - pattern
        .counts()
        .iter()
        .zip(duals)
        .map(|(&c, pi)| c as f64 * pi)
        .sum::<f64>()
}

pub(crate) fn knapsack_program(duals: &[f64], instance: &Instance) -> LinearProgram {
    let mut program = LinearProgram::new("Subproblem", Sense::Maximize);
    let names: Vec<String> = (0..instance.n_items()).map(|i| format!("y_{i}")).collect();
    let ys = program.add(
        names
            .iter()
            .zip(duals)
            .map(|(name, &pi)| var().int().obj(pi).name(name)),
    );
    program.add(
        cons()
            .name("width")
            .expr(ys.into_iter().zip(instance.widths().iter().copied()))
            .le(instance.stock_width()),
    );
    program
}

/// Solves the pricing knapsack for `duals` and returns the best pattern with its reduced cost.
///
/// Integer variables are rounded to the nearest integer; values farther than
/// `integrality_tolerance` from it are reported as a warning.
pub fn solve_subproblem(
    duals: &[f64],
    instance: &Instance,
    solver: &dyn Solver,
    integrality_tolerance: f64,
    feasibility_tolerance: f64,
) -> Result<PricingResult> {
    let stage = Stage::Pricing;
    if duals.len() != instance.n_items() {
        return Err(CutError::solver(
            stage,
            SolveError::DimensionMismatch {
                what: "dual prices",
                expected: instance.n_items(),
                got: duals.len(),
            },
        ));
    }

    let program = knapsack_program(duals, instance);
    let solution = solver
        .solve(&program)
        .map_err(|e| CutError::solver(stage, e))?;
    if solution.status != SolveStatus::Optimal {
        // the knapsack always admits the empty pattern and is bounded by the board width
        return Err(CutError::solver(stage, SolveError::Status(solution.status)));
    }
    if solution.values.len() != instance.n_items() {
        return Err(CutError::solver(
            stage,
            SolveError::DimensionMismatch {
                what: "knapsack variables",
                expected: instance.n_items(),
                got: solution.values.len(),
            },
        ));
    }

    let counts = solution
        .values
        .iter()
        .enumerate()
        .map(|(item, &y)| {
            let rounded = y.round().max(0.0);
            if (y - rounded).abs() > integrality_tolerance {
                warn!("[PRICING] y_{item} = {y} is not integral, rounding to {rounded}");
            }
            if rounded > u32::MAX as f64 {
                return Err(CutError::solver(
                    stage,
                    SolveError::CountOutOfRange { item, value: y },
                ));
            }
            Ok(rounded as u32)
        })
        .collect::<Result<Vec<u32>>>()?;
    let pattern = Pattern::new(counts);
    if !pattern.fits(instance, feasibility_tolerance) {
        return Err(CutError::solver(
            stage,
            SolveError::InvalidPattern {
                width: pattern.used_width(instance.widths()),
                pattern: pattern.counts().to_vec(),
                stock_width: instance.stock_width(),
            },
        ));
    }

    let reduced_cost = 1.0 - solution.objective;
    debug!("[PRICING] best pattern {pattern}, reduced cost {reduced_cost:.6}");
    Ok(PricingResult {
        reduced_cost,
        pattern,
    })
}
