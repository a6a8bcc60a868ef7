//! Column generation over the pattern pool.
//!
//! Each step solves the restricted master over the current pool and prices its duals. A pattern
//! with negative enough reduced cost is appended to the pool, otherwise the pool is final.

use log::{debug, info};

use crate::config::CuttingConfig;
use crate::error::{CutError, Result};
use crate::instance::Instance;
use crate::master::{MasterLp, solve_master};
use crate::pattern::{PatternPool, initial_patterns};
use crate::pricing::solve_subproblem;
use crate::solver::Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The last pricing found an improving pattern.
    Iterating,
    /// No pattern prices out, the last master LP is optimal over all patterns.
    Converged,
}

/// What happened in one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub iteration: usize,
    pub rmp_objective: f64,
    pub reduced_cost: f64,
    /// Pool size after the iteration.
    pub pool_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGenerationOutcome {
    pub pool: PatternPool,
    /// Master LP of the converging iteration, solved over the final pool. Its duals leave no
    /// pattern with a reduced cost below `-reduced_cost_tolerance`.
    pub last_lp: MasterLp,
    pub history: Vec<IterationRecord>,
}

pub struct ColumnGeneration<'a> {
    instance: &'a Instance,
    config: CuttingConfig,
    solver: &'a dyn Solver,
    pool: PatternPool,
    state: State,
    history: Vec<IterationRecord>,
    converged_lp: Option<MasterLp>,
}

impl<'a> ColumnGeneration<'a> {
    /// Starts from the singleton patterns of `instance`.
    pub fn new(instance: &'a Instance, config: CuttingConfig, solver: &'a dyn Solver) -> Self {
        let pool = initial_patterns(instance, config.feasibility_tolerance);
        ColumnGeneration {
            instance,
            config,
            solver,
            pool,
            state: State::Iterating,
            history: Vec::new(),
            converged_lp: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pool(&self) -> &PatternPool {
        &self.pool
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    /// Runs one iteration and returns the resulting state. Does nothing once converged.
    pub fn step(&mut self) -> Result<State> {
        if self.state == State::Converged {
            return Ok(State::Converged);
        }
        if self.history.len() >= self.config.max_iterations {
            return Err(CutError::IterationLimit {
                iterations: self.history.len(),
                last_reduced_cost: self.history.last().map_or(f64::NAN, |r| r.reduced_cost),
            });
        }

        let lp = solve_master(&self.pool, self.instance, self.solver)?;
        let priced = solve_subproblem(
            &lp.duals,
            self.instance,
            self.solver,
            self.config.integrality_tolerance,
            self.config.feasibility_tolerance,
        )?;

        if priced.improves(self.config.reduced_cost_tolerance) {
            self.pool.push(priced.pattern);
        } else {
            self.state = State::Converged;
            self.converged_lp = Some(lp.clone());
        }

        let record = IterationRecord {
            iteration: self.history.len() + 1,
            rmp_objective: lp.objective,
            reduced_cost: priced.reduced_cost,
            pool_size: self.pool.len(),
        };
        debug!(
            "[CG] iteration {}: rmp {:.4}, reduced cost {:.6}, {} patterns",
            record.iteration, record.rmp_objective, record.reduced_cost, record.pool_size
        );
        self.history.push(record);
        Ok(self.state)
    }

    /// Iterates until no pattern improves the master any more.
    pub fn run(mut self) -> Result<ColumnGenerationOutcome> {
        let last_lp = loop {
            self.step()?;
            if let Some(lp) = self.converged_lp.take() {
                break lp;
            }
        };
        info!(
            "[CG] converged after {} iterations, lp bound {:.4}, {} patterns",
            self.history.len(),
            last_lp.objective,
            self.pool.len()
        );
        Ok(ColumnGenerationOutcome {
            pool: self.pool,
            last_lp,
            history: self.history,
        })
    }
}
