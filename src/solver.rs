//! The solver capability used by the cutting stock algorithm and its SCIP backend.

use log::{trace, warn};
use thiserror::Error;

use crate::lp::{LinearProgram, LpSolution, SolveStatus};
use crate::retcode::Retcode;
use crate::scip::{ParamSetting, ScipPtr};

/// Anything that can solve a [`LinearProgram`] to optimality.
///
/// Implementations return `Ok` whenever the solver ran, whatever the status; `Err` is reserved
/// for failures of the solver itself.
pub trait Solver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolveError>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolveError> {
        (**self).solve(program)
    }
}

/// Failure of a solve, or a solver answer the algorithm cannot use.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Retcode(#[from] Retcode),

    #[error("solver stopped with status {0:?}")]
    Status(SolveStatus),

    #[error("solver did not provide dual values for a linear program")]
    MissingDuals,

    #[error("solver returned {got} values for {expected} {what}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("pricing returned pattern {pattern:?} of width {width} for stock width {stock_width}")]
    InvalidPattern {
        pattern: Vec<u32>,
        width: f64,
        stock_width: f64,
    },

    #[error("solver value {value} of y_{item} is out of range for a piece count")]
    CountOutOfRange { item: usize, value: f64 },

    #[error("integer solution sums to {reproduced} boards but the solver reported {reported}")]
    ObjectiveMismatch { reproduced: u64, reported: f64 },
}

/// Settings applied to every SCIP instance created by [`ScipSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScipSettings {
    /// Time limit per solve, in seconds.
    pub time_limit: Option<f64>,
    /// Keep SCIP's own console output.
    pub show_output: bool,
}

/// [`Solver`] backed by SCIP. Each call creates, solves and frees its own SCIP instance,
/// so a `ScipSolver` can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScipSolver {
    settings: ScipSettings,
}

impl ScipSolver {
    pub fn new(settings: ScipSettings) -> Self {
        ScipSolver { settings }
    }

    fn configure(&self, scip: &ScipPtr, pure_lp: bool) -> Result<(), Retcode> {
        scip.include_default_plugins()?;
        if !self.settings.show_output {
            scip.set_int_param("display/verblevel", 0)?;
        }
        if let Some(limit) = self.settings.time_limit {
            scip.set_real_param("limits/time", limit)?;
        }
        if pure_lp {
            // duals are read from the root LP rows, which must be the declared constraints
            scip.set_presolving(ParamSetting::Off)?;
            scip.set_heuristics(ParamSetting::Off)?;
            scip.set_separating(ParamSetting::Off)?;
            scip.set_int_param("propagating/maxrounds", 0)?;
            scip.set_int_param("propagating/maxroundsroot", 0)?;
        }
        Ok(())
    }
}

impl Solver for ScipSolver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolveError> {
        let pure_lp = !program.has_integer_vars();
        let mut scip = ScipPtr::new()?;
        self.configure(&scip, pure_lp)?;
        scip.create_prob(program.name())?;
        scip.set_obj_sense(program.sense())?;

        let mut vars = Vec::with_capacity(program.vars().len());
        for var in program.vars() {
            vars.push(scip.create_var(var.lb, var.ub, var.obj, &var.name, var.kind)?);
        }

        let mut conss = Vec::with_capacity(program.conss().len());
        for cons in program.conss() {
            let (cons_vars, coefs): (Vec<_>, Vec<_>) =
                cons.coefs.iter().map(|(v, c)| (vars[v.index()], *c)).unzip();
            conss.push(scip.create_cons(&cons_vars, &coefs, cons.lhs, cons.rhs, &cons.name)?);
        }

        trace!(
            "[SCIP] solving {} ({} vars, {} conss, pure lp: {pure_lp})",
            program.name(),
            vars.len(),
            conss.len()
        );
        scip.solve()?;

        let status = scip.status();
        if status.is_limit() {
            warn!("[SCIP] {} stopped early with status {status:?}", program.name());
        }
        let status = SolveStatus::from(status);
        let Some(sol) = scip.best_sol() else {
            return Ok(LpSolution::without_values(status));
        };
        if status != SolveStatus::Optimal {
            // a solution exists but optimality is not proven, values are of no use downstream
            return Ok(LpSolution::without_values(status));
        }

        let values = vars.iter().map(|&v| scip.sol_val(sol, v)).collect();
        let objective = scip.sol_obj_val(sol);
        let duals = if pure_lp {
            let mut duals = Vec::with_capacity(conss.len());
            for &cons in &conss {
                duals.push(scip.dual_sol_linear(cons)?);
            }
            Some(duals)
        } else {
            None
        };

        Ok(LpSolution {
            status,
            objective,
            values,
            duals,
        })
    }
}

/// Answers every program with the same solution.
#[cfg(test)]
pub(crate) struct Fixed(pub LpSolution);

#[cfg(test)]
impl Solver for Fixed {
    fn solve(&self, _program: &LinearProgram) -> Result<LpSolution, SolveError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{Sense, cons, var};
    use crate::status::Status;

    #[test]
    fn lp_with_duals() {
        // min 2x + 3y  s.t.  x + y >= 4,  x + 3y >= 5,  x <= 3
        let mut lp = LinearProgram::new("dual_test", Sense::Minimize);
        let x = lp.add(var().obj(2.0).name("x"));
        let y = lp.add(var().obj(3.0).name("y"));
        lp.add(cons().coef(x, 1.0).coef(y, 1.0).ge(4.0));
        lp.add(cons().coef(x, 1.0).coef(y, 3.0).ge(5.0));
        lp.add(cons().coef(x, 1.0).le(3.0));

        let sol = ScipSolver::default().solve(&lp).unwrap();
        assert!(sol.is_optimal());
        assert!((sol.objective - 9.0).abs() < 1e-6);
        assert!((sol.val(x) - 3.0).abs() < 1e-6);
        assert!((sol.val(y) - 1.0).abs() < 1e-6);

        // rows one and three are tight: u1 = 3, u2 = 0, u3 = 2 - u1 = -1
        let duals = sol.duals.unwrap();
        assert_eq!(duals.len(), 3);
        assert!((duals[0] - 3.0).abs() < 1e-6);
        assert!(duals[1].abs() < 1e-6);
        assert!((duals[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn integer_program_has_no_duals() {
        // max 5a + 4b  s.t.  6a + 4b <= 24,  a + 2b <= 6,  a, b integer
        let mut lp = LinearProgram::new("ip", Sense::Maximize);
        let a = lp.add(var().int().obj(5.0));
        let b = lp.add(var().int().obj(4.0));
        lp.add(cons().expr([(a, 6.0), (b, 4.0)]).le(24.0));
        lp.add(cons().expr([(a, 1.0), (b, 2.0)]).le(6.0));

        let sol = ScipSolver::default().solve(&lp).unwrap();
        assert!(sol.is_optimal());
        assert!(sol.duals.is_none());
        assert!((sol.objective - 20.0).abs() < 1e-6);
        let (va, vb) = (sol.val(a), sol.val(b));
        assert!((va - va.round()).abs() < 1e-6 && (vb - vb.round()).abs() < 1e-6);
        assert!(6.0 * va + 4.0 * vb <= 24.0 + 1e-6);
    }

    #[test]
    fn infeasible_status_is_reported() {
        let mut lp = LinearProgram::new("infeasible", Sense::Minimize);
        let x = lp.add(var().obj(1.0));
        lp.add(cons().coef(x, 1.0).le(-1.0));
        let sol = ScipSolver::default().solve(&lp).unwrap();
        assert!(matches!(
            sol.status,
            SolveStatus::Infeasible | SolveStatus::Other(Status::Inforunbd)
        ));
        assert!(sol.values.is_empty());
    }

    #[test]
    fn unbounded_status_is_reported() {
        let mut lp = LinearProgram::new("unbounded", Sense::Maximize);
        let x = lp.add(var().int().obj(1.0));
        lp.add(cons().coef(x, 1.0).ge(1.0));
        let sol = ScipSolver::default().solve(&lp).unwrap();
        assert!(matches!(
            sol.status,
            SolveStatus::Unbounded | SolveStatus::Other(Status::Inforunbd)
        ));
    }

    #[test]
    fn solver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScipSolver>();
    }
}
