//! The pattern covering problem: choose how many boards to cut with each pattern of the pool
//! so that every demand is met, using as few boards as possible.

use log::debug;

use crate::error::{CutError, Result, Stage};
use crate::instance::Instance;
use crate::lp::{LinearProgram, LpSolution, Sense, SolveStatus, VarKind, cons, var};
use crate::pattern::PatternPool;
use crate::solver::{SolveError, Solver};

/// Optimal solution of the linear relaxation over the current pool.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterLp {
    /// Number of boards, fractional.
    pub objective: f64,
    /// Boards per pattern, one entry per pattern of the pool at solve time.
    pub usage: Vec<f64>,
    /// Dual price of each demand constraint, in demand order.
    pub duals: Vec<f64>,
}

/// Optimal integer solution over the final pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerMaster {
    /// Boards cut in total, `usage.iter().sum()`.
    pub total_boards: u64,
    /// Boards per pattern, one entry per pattern of the pool.
    pub usage: Vec<u64>,
}

/// min sum x_j  s.t.  sum_j pattern_j[i] * x_j >= demand_i for every item i.
///
/// Constraints are declared in item order, so the i-th dual belongs to item i.
pub(crate) fn covering_program(
    pool: &PatternPool,
    instance: &Instance,
    kind: VarKind,
) -> LinearProgram {
    let name = match kind {
        VarKind::Continuous => "CuttingStockMaster",
        VarKind::Integer => "FinalMaster",
    };
    let mut program = LinearProgram::new(name, Sense::Minimize);
    let names: Vec<String> = (0..pool.len()).map(|j| format!("x_{j}")).collect();
    let xs = program.add(names.iter().map(|name| var().kind(kind).obj(1.0).name(name)));

    for (i, &demand) in instance.demands().iter().enumerate() {
        let name = format!("demand_{i}");
        program.add(
            cons()
                .name(&name)
                .expr(xs.iter().zip(pool).map(|(&x, p)| (x, p[i] as f64)))
                .ge(demand as f64),
        );
    }
    program
}

fn check_status(solution: &LpSolution, stage: Stage) -> Result<()> {
    match solution.status {
        SolveStatus::Optimal => Ok(()),
        SolveStatus::Infeasible => Err(CutError::ModelInfeasible { stage }),
        other => Err(CutError::solver(stage, SolveError::Status(other))),
    }
}

fn check_len(stage: Stage, what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(CutError::solver(
            stage,
            SolveError::DimensionMismatch {
                what,
                expected,
                got,
            },
        ))
    }
}

/// Solves the restricted master problem (the linear relaxation over `pool`) and returns its
/// objective, primal values and dual prices.
pub fn solve_master(
    pool: &PatternPool,
    instance: &Instance,
    solver: &dyn Solver,
) -> Result<MasterLp> {
    let stage = Stage::RestrictedMaster;
    let program = covering_program(pool, instance, VarKind::Continuous);
    let solution = solver
        .solve(&program)
        .map_err(|e| CutError::solver(stage, e))?;
    check_status(&solution, stage)?;
    check_len(stage, "patterns", pool.len(), solution.values.len())?;

    let duals = solution
        .duals
        .ok_or_else(|| CutError::solver(stage, SolveError::MissingDuals))?;
    check_len(stage, "demand constraints", instance.n_items(), duals.len())?;

    debug!(
        "[RMP] {} patterns, objective {:.4}, duals {:?}",
        pool.len(),
        solution.objective,
        duals
    );
    Ok(MasterLp {
        objective: solution.objective,
        usage: solution.values,
        duals,
    })
}

/// Solves the covering problem over `pool` with integer board counts.
///
/// The total is reproduced as the sum of the rounded counts, not taken from the solver.
pub fn solve_final_integer_master(
    pool: &PatternPool,
    instance: &Instance,
    solver: &dyn Solver,
) -> Result<IntegerMaster> {
    let stage = Stage::FinalMaster;
    let program = covering_program(pool, instance, VarKind::Integer);
    let solution = solver
        .solve(&program)
        .map_err(|e| CutError::solver(stage, e))?;
    check_status(&solution, stage)?;
    check_len(stage, "patterns", pool.len(), solution.values.len())?;

    let usage: Vec<u64> = solution
        .values
        .iter()
        .map(|&x| x.round().max(0.0) as u64)
        .collect();
    let total_boards = usage.iter().sum();
    if (total_boards as f64 - solution.objective).abs() > 0.5 {
        return Err(CutError::solver(
            stage,
            SolveError::ObjectiveMismatch {
                reproduced: total_boards,
                reported: solution.objective,
            },
        ));
    }

    debug!("[FINAL] {total_boards} boards over {} patterns", pool.len());
    Ok(IntegerMaster {
        total_boards,
        usage,
    })
}

/// Pieces of each width produced by cutting `usage[j]` boards with pattern `j`.
pub fn produced(pool: &PatternPool, usage: &[u64], n_items: usize) -> Vec<u64> {
    let mut produced = vec![0u64; n_items];
    for (pattern, &boards) in pool.iter().zip(usage) {
        for (i, &count) in pattern.counts().iter().enumerate() {
            produced[i] += count as u64 * boards;
        }
    }
    produced
}
