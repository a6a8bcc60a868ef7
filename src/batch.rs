use log::info;
use rayon::prelude::*;

use crate::config::CuttingConfig;
use crate::error::Result;
use crate::instance::Instance;
use crate::report::CuttingPlan;

/// Solves independent instances in parallel, returning one result per instance in input order.
///
/// Every worker builds its own solver state; one failing instance does not affect the others.
pub fn solve_batch(instances: &[Instance], config: &CuttingConfig) -> Vec<Result<CuttingPlan>> {
    info!("[BATCH] solving {} instances", instances.len());
    instances
        .par_iter()
        .map(|instance| crate::solve(instance, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CutError;

    #[test]
    fn results_keep_input_order() {
        let instances: Vec<Instance> = (1..=6)
            .map(|r| Instance::new(10.0, vec![10.0], vec![r]).unwrap())
            .collect();
        let plans = solve_batch(&instances, &CuttingConfig::default());
        assert_eq!(plans.len(), 6);
        for (r, plan) in (1..=6).zip(plans) {
            assert_eq!(plan.unwrap().total_boards, r);
        }
    }

    #[test]
    fn iteration_limit_applies_per_instance() {
        let instances = vec![
            Instance::new(15.0, vec![4.0, 6.0, 7.0], vec![8, 5, 10]).unwrap(),
            Instance::new(15.0, vec![4.0, 6.0, 7.0], vec![80, 50, 100]).unwrap(),
        ];
        let config = CuttingConfig {
            max_iterations: 1,
            ..CuttingConfig::default()
        };
        let plans = solve_batch(&instances, &config);
        // both instances need more than one iteration
        assert!(plans.iter().all(|p| matches!(p, Err(CutError::IterationLimit { .. }))));

        let plans = solve_batch(&instances, &CuttingConfig::default());
        assert!(plans.iter().all(|p| p.as_ref().is_ok_and(|plan| plan.covers_demands())));
    }

    #[test]
    fn empty_batch() {
        assert!(solve_batch(&[], &CuttingConfig::default()).is_empty());
    }
}
