//! One-dimensional cutting stock by column generation.
//!
//! Boards of a fixed width are cut into pieces of given widths so that every demand is met
//! with as few boards as possible. The linear relaxation is solved over a growing pool of
//! cutting patterns, new patterns come from an integer knapsack priced with the relaxation's
//! duals, and the final plan is the integer covering problem over the pool.
//!
//! ```no_run
//! use cutstock::{CuttingConfig, Instance};
//!
//! let instance = Instance::new(15.0, vec![4.0, 6.0, 7.0], vec![80, 50, 100]).unwrap();
//! let plan = cutstock::solve(&instance, &CuttingConfig::default()).unwrap();
//! println!("{plan}");
//! ```

pub use scip_sys as ffi;

mod retcode;
pub use retcode::Retcode;

mod status;
pub use status::Status;

mod scip;

/// Solver independent description of linear and integer programs.
pub mod lp;

/// The solver capability and its SCIP backend.
pub mod solver;
pub use solver::{ScipSettings, ScipSolver, SolveError, Solver};

pub mod error;
pub use error::{CutError, InputError, Stage};

pub mod instance;
pub use instance::Instance;

pub mod config;
pub use config::CuttingConfig;

pub mod pattern;
pub use pattern::{Pattern, PatternPool};

pub mod master;
pub mod pricing;

/// The column generation loop.
pub mod colgen;
pub use colgen::{ColumnGeneration, ColumnGenerationOutcome, IterationRecord, State};

pub mod report;
pub use report::{CuttingPlan, PatternUsage};

/// Solving many instances in parallel.
pub mod batch;

/// Command line interface, logging and file formats of the `cutstock` binary.
pub mod io;

use log::info;

/// Solves `instance` with SCIP, configured from `config`.
pub fn solve(instance: &Instance, config: &CuttingConfig) -> error::Result<CuttingPlan> {
    let solver = ScipSolver::new(config.scip_settings());
    solve_with(instance, config, &solver)
}

/// Solves `instance` with any [`Solver`].
pub fn solve_with(
    instance: &Instance,
    config: &CuttingConfig,
    solver: &dyn Solver,
) -> error::Result<CuttingPlan> {
    info!(
        "[SOLVE] stock width {}, {} piece widths, {} pieces demanded",
        instance.stock_width(),
        instance.n_items(),
        instance.demands().iter().sum::<u64>()
    );
    let outcome = ColumnGeneration::new(instance, *config, solver).run()?;
    let master = master::solve_final_integer_master(&outcome.pool, instance, solver)?;
    let plan = CuttingPlan::new(instance, &outcome, &master);
    info!(
        "[SOLVE] {} boards (lp bound {:.4}, material bound {}), waste {}",
        plan.total_boards,
        plan.lp_bound,
        instance.material_bound(),
        plan.total_waste()
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_instance() {
        let instance = Instance::new(15.0, vec![4.0, 6.0, 7.0], vec![80, 50, 100]).unwrap();
        let plan = solve(&instance, &CuttingConfig::default()).unwrap();
        assert_eq!(plan.total_boards, 95);
        assert!(plan.total_boards >= instance.material_bound());
        assert!(plan.total_boards as f64 >= plan.lp_bound - 1e-3);
        assert!(plan.covers_demands());
        assert_eq!(plan.cuts.iter().map(|c| c.boards).sum::<u64>(), plan.total_boards);
        assert!(plan.to_string().starts_with("Cutting patterns used:\n"));
        assert!(plan.to_string().ends_with("Total boards used: 95"));
    }

    #[test]
    fn zero_demands() {
        let instance = Instance::new(15.0, vec![4.0, 6.0, 7.0], vec![0, 0, 0]).unwrap();
        let plan = solve(&instance, &CuttingConfig::default()).unwrap();
        assert_eq!(plan.total_boards, 0);
        assert!(plan.cuts.is_empty());
        assert_eq!(plan.iterations, 1);
        assert_eq!(plan.pool_size, 3);
    }

    #[test]
    fn single_piece_width() {
        let instance = Instance::new(8.0, vec![8.0], vec![13]).unwrap();
        let plan = solve(&instance, &CuttingConfig::default()).unwrap();
        assert_eq!(plan.total_boards, 13);
        assert_eq!(plan.cuts.len(), 1);
        assert_eq!(plan.cuts[0].pattern.counts(), &[1]);
        assert_eq!(plan.total_waste(), 0.0);
    }

    #[test]
    fn fractional_widths() {
        let instance = Instance::new(1.0, vec![0.3, 0.45], vec![10, 4]).unwrap();
        let plan = solve(&instance, &CuttingConfig::default()).unwrap();
        assert!(plan.covers_demands());
        assert!(plan.cuts.iter().all(|c| c.waste >= -1e-9));
        assert!(plan.total_boards >= instance.material_bound());
    }
}
