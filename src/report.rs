use std::fmt;

use serde::Serialize;

use crate::colgen::ColumnGenerationOutcome;
use crate::instance::Instance;
use crate::master::IntegerMaster;
use crate::pattern::Pattern;

/// A pattern together with the number of boards cut with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternUsage {
    pub pattern: Pattern,
    pub boards: u64,
    /// Leftover width of every board cut with `pattern`.
    pub waste: f64,
}

/// The result of a cutting stock run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuttingPlan {
    pub stock_width: f64,
    pub widths: Vec<f64>,
    pub demands: Vec<u64>,
    /// Patterns with a positive number of boards, in pool order.
    pub cuts: Vec<PatternUsage>,
    pub total_boards: u64,
    /// Objective of the last master LP, a lower bound on `total_boards` up to the pricing
    /// tolerance.
    pub lp_bound: f64,
    pub iterations: usize,
    pub pool_size: usize,
}

impl CuttingPlan {
    pub fn new(
        instance: &Instance,
        outcome: &ColumnGenerationOutcome,
        master: &IntegerMaster,
    ) -> Self {
        let cuts = outcome
            .pool
            .iter()
            .zip(&master.usage)
            .filter(|(_, boards)| **boards > 0)
            .map(|(pattern, &boards)| PatternUsage {
                pattern: pattern.clone(),
                boards,
                waste: pattern.waste(instance),
            })
            .collect();
        CuttingPlan {
            stock_width: instance.stock_width(),
            widths: instance.widths().to_vec(),
            demands: instance.demands().to_vec(),
            cuts,
            total_boards: master.total_boards,
            lp_bound: outcome.last_lp.objective,
            iterations: outcome.history.len(),
            pool_size: outcome.pool.len(),
        }
    }

    /// Width thrown away over all boards.
    pub fn total_waste(&self) -> f64 {
        self.cuts.iter().map(|c| c.waste * c.boards as f64).sum()
    }

    /// Pieces cut of every width.
    pub fn produced(&self) -> Vec<u64> {
        let mut produced = vec![0; self.widths.len()];
        for cut in &self.cuts {
            for (p, &count) in produced.iter_mut().zip(cut.pattern.counts()) {
                *p += count as u64 * cut.boards;
            }
        }
        produced
    }

    /// Whether every demand is met.
    pub fn covers_demands(&self) -> bool {
        self.produced().iter().zip(&self.demands).all(|(p, d)| p >= d)
    }
}

impl fmt::Display for CuttingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cutting patterns used:")?;
        for cut in &self.cuts {
            writeln!(f, "Use pattern {} --> {} times", cut.pattern, cut.boards)?;
        }
        writeln!(f)?;
        write!(f, "Total boards used: {}", self.total_boards)
    }
}
