//! Solver-independent description of the linear and integer programs built by the
//! cutting stock algorithm, and of the answers a [`Solver`](crate::solver::Solver)
//! gives back for them.

use crate::status::Status;

/// Objective sense of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// The objective is minimized.
    Minimize,
    /// The objective is maximized.
    Maximize,
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Real valued variable.
    Continuous,
    /// Integer valued variable.
    Integer,
}

/// Handle of a variable inside the program that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in declaration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A decision variable with its bounds and objective coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub kind: VarKind,
    pub lb: f64,
    pub ub: f64,
    pub obj: f64,
}

/// A linear constraint `lhs <= sum(coef * var) <= rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub coefs: Vec<(VarId, f64)>,
    pub lhs: f64,
    pub rhs: f64,
}

/// A linear (or mixed integer linear) program.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    name: String,
    sense: Sense,
    vars: Vec<Var>,
    conss: Vec<LinearConstraint>,
}

impl LinearProgram {
    /// Creates an empty program with the given name and objective sense.
    pub fn new(name: &str, sense: Sense) -> Self {
        LinearProgram {
            name: name.to_string(),
            sense,
            vars: Vec::new(),
            conss: Vec::new(),
        }
    }

    /// Adds a variable or a constraint (see [`var`] and [`cons`]).
    pub fn add<T: AddToProgram>(&mut self, item: T) -> T::Return {
        item.add(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn conss(&self) -> &[LinearConstraint] {
        &self.conss
    }

    /// Whether any variable must take integer values.
    pub fn has_integer_vars(&self) -> bool {
        self.vars.iter().any(|v| v.kind == VarKind::Integer)
    }
}

/// Something that can be added to a [`LinearProgram`].
pub trait AddToProgram {
    /// The handle returned after adding (e.g. [`VarId`]).
    type Return;
    /// How to add the value to the program.
    fn add(self, program: &mut LinearProgram) -> Self::Return;
}

impl<T, I> AddToProgram for I
where
    T: AddToProgram,
    I: IntoIterator<Item = T>,
{
    type Return = Vec<T::Return>;
    fn add(self, program: &mut LinearProgram) -> Self::Return {
        self.into_iter().map(|x| x.add(program)).collect()
    }
}

/// A builder for variables.
#[derive(Debug)]
pub struct VarBuilder<'a> {
    name: Option<&'a str>,
    obj: f64,
    lb: f64,
    ub: f64,
    kind: VarKind,
}

/// Creates a new default `VarBuilder`: a continuous variable in `[0, inf)` with objective `0`.
pub fn var<'a>() -> VarBuilder<'a> {
    VarBuilder::default()
}

impl Default for VarBuilder<'_> {
    fn default() -> Self {
        VarBuilder {
            name: None,
            obj: 0.0,
            lb: 0.0,
            ub: f64::INFINITY,
            kind: VarKind::Continuous,
        }
    }
}

impl<'a> VarBuilder<'a> {
    /// Makes the variable a non-negative integer.
    pub fn int(mut self) -> Self {
        self.kind = VarKind::Integer;
        self
    }

    /// Sets the domain of the variable.
    pub fn kind(mut self, kind: VarKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the name of the variable.
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the objective coefficient of the variable.
    pub fn obj(mut self, obj: f64) -> Self {
        self.obj = obj;
        self
    }
}

impl AddToProgram for VarBuilder<'_> {
    type Return = VarId;
    fn add(self, program: &mut LinearProgram) -> VarId {
        let id = VarId(program.vars.len());
        let name = self
            .name
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("x{}", id.0));
        program.vars.push(Var {
            name,
            kind: self.kind,
            lb: self.lb,
            ub: self.ub,
            obj: self.obj,
        });
        id
    }
}

/// A builder for linear constraints.
#[derive(Debug)]
pub struct ConsBuilder<'a> {
    lhs: f64,
    rhs: f64,
    name: Option<&'a str>,
    coefs: Vec<(VarId, f64)>,
}

/// Creates a new default `ConsBuilder` (a free row without coefficients).
pub fn cons<'a>() -> ConsBuilder<'a> {
    ConsBuilder::default()
}

impl Default for ConsBuilder<'_> {
    fn default() -> Self {
        ConsBuilder {
            lhs: f64::NEG_INFINITY,
            rhs: f64::INFINITY,
            name: None,
            coefs: Vec::new(),
        }
    }
}

impl<'a> ConsBuilder<'a> {
    /// Creates a constraint of the form `expr <= val`.
    pub fn le(mut self, val: f64) -> Self {
        self.rhs = val;
        self.lhs = f64::NEG_INFINITY;
        self
    }

    /// Creates a constraint of the form `val <= expr`.
    pub fn ge(mut self, val: f64) -> Self {
        self.lhs = val;
        self.rhs = f64::INFINITY;
        self
    }

    /// Sets the name of the constraint.
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Adds a coefficient to the constraint.
    pub fn coef(mut self, var: VarId, coef: f64) -> Self {
        self.coefs.push((var, coef));
        self
    }

    /// Adds multiple coefficients to the constraint.
    pub fn expr<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (VarId, f64)>,
    {
        self.coefs.extend(iter);
        self
    }
}

impl AddToProgram for ConsBuilder<'_> {
    type Return = usize;
    fn add(self, program: &mut LinearProgram) -> usize {
        let index = program.conss.len();
        let name = self
            .name
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("c{index}"));
        assert!(
            self.coefs.iter().all(|(v, _)| v.0 < program.vars.len()),
            "constraint {name} references a variable of another program"
        );
        // zero coefficients only bloat the solver's rows
        let coefs = self.coefs.into_iter().filter(|(_, c)| *c != 0.0).collect();
        program.conss.push(LinearConstraint {
            name,
            coefs,
            lhs: self.lhs,
            rhs: self.rhs,
        });
        index
    }
}

/// Outcome class of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A proven optimal solution is available.
    Optimal,
    /// The program has no feasible solution.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// Anything else the backend reported (limits, interrupts, unknown).
    Other(Status),
}

impl From<Status> for SolveStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Optimal => SolveStatus::Optimal,
            Status::Infeasible => SolveStatus::Infeasible,
            Status::Unbounded => SolveStatus::Unbounded,
            other => SolveStatus::Other(other),
        }
    }
}

/// Answer of a solver for a [`LinearProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub status: SolveStatus,
    /// Objective value of the best solution (meaningless unless `Optimal`).
    pub objective: f64,
    /// One value per variable, in declaration order.
    pub values: Vec<f64>,
    /// One dual value per constraint, in declaration order. Only for programs without
    /// integer variables. Signs follow the minimization form of the program.
    pub duals: Option<Vec<f64>>,
}

impl LpSolution {
    /// A solution carrying only a status, for runs that produced no primal values.
    pub fn without_values(status: SolveStatus) -> Self {
        LpSolution {
            status,
            objective: f64::NAN,
            values: Vec::new(),
            duals: None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Value of a variable.
    pub fn val(&self, var: VarId) -> f64 {
        self.values[var.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_variables_in_order() {
        let mut lp = LinearProgram::new("test", Sense::Minimize);
        let x = lp.add(var().obj(1.0).name("x"));
        let y = lp.add(var().int().obj(2.0));
        assert_eq!(x.index(), 0);
        assert_eq!(y.index(), 1);
        assert_eq!(lp.vars()[0].name, "x");
        assert_eq!(lp.vars()[1].name, "x1");
        assert_eq!(lp.vars()[1].kind, VarKind::Integer);
        assert_eq!(lp.vars()[1].lb, 0.0);
        assert!(lp.vars()[1].ub.is_infinite());
        assert!(lp.has_integer_vars());
    }

    #[test]
    fn add_many_variables() {
        let mut lp = LinearProgram::new("many", Sense::Maximize);
        let names = ["a", "b", "c"];
        let ids = lp.add(names.iter().map(|n| var().name(n).obj(1.0)));
        assert_eq!(ids.len(), 3);
        assert_eq!(lp.vars().len(), 3);
        assert!(!lp.has_integer_vars());
    }

    #[test]
    fn constraint_bounds() {
        let mut lp = LinearProgram::new("test", Sense::Minimize);
        let x = lp.add(var());
        let y = lp.add(var());
        let ge = lp.add(cons().name("cover").coef(x, 2.0).coef(y, 1.0).ge(4.0));
        let le = lp.add(cons().expr([(x, 1.0), (y, 3.0)]).le(9.0));
        assert_eq!((ge, le), (0, 1));

        let conss = lp.conss();
        assert_eq!(conss[0].name, "cover");
        assert_eq!(conss[0].lhs, 4.0);
        assert!(conss[0].rhs.is_infinite());
        assert!(conss[1].lhs.is_infinite() && conss[1].lhs < 0.0);
        assert_eq!(conss[1].rhs, 9.0);
        assert_eq!(conss[1].name, "c1");
    }

    #[test]
    fn zero_coefficients_are_dropped() {
        let mut lp = LinearProgram::new("test", Sense::Minimize);
        let x = lp.add(var());
        let y = lp.add(var());
        lp.add(cons().coef(x, 0.0).coef(y, 3.0).ge(1.0));
        assert_eq!(lp.conss()[0].coefs, vec![(y, 3.0)]);
    }

    #[test]
    #[should_panic]
    fn foreign_variable_is_rejected() {
        let mut other = LinearProgram::new("other", Sense::Minimize);
        other.add(var());
        let foreign = other.add(var());
        let mut lp = LinearProgram::new("test", Sense::Minimize);
        lp.add(cons().coef(foreign, 1.0).ge(0.0));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(SolveStatus::from(Status::Optimal), SolveStatus::Optimal);
        assert_eq!(SolveStatus::from(Status::Infeasible), SolveStatus::Infeasible);
        assert_eq!(
            SolveStatus::from(Status::TimeLimit),
            SolveStatus::Other(Status::TimeLimit)
        );
        assert!(!LpSolution::without_values(SolveStatus::Unbounded).is_optimal());
    }
}
