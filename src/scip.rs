use crate::ffi;
use crate::lp::{Sense, VarKind};
use crate::retcode::{Retcode, scip_call, scip_call_panic};
use crate::status::Status;
use scip_sys::{SCIP_Cons, SCIP_SOL, SCIP_Var};
use std::ffi::CString;
use std::mem::MaybeUninit;

/// Owner of one SCIP instance and of the variables and constraints created through it.
///
/// Not `Send`: a `ScipPtr` lives and dies inside a single
/// [`ScipSolver::solve`](crate::solver::ScipSolver) call.
#[derive(Debug)]
pub(crate) struct ScipPtr {
    pub(crate) raw: *mut ffi::SCIP,
    vars: Vec<*mut SCIP_Var>,
    conss: Vec<*mut SCIP_Cons>,
}

fn c_string(s: &str) -> Result<CString, Retcode> {
    CString::new(s).map_err(|_| Retcode::InvalidData)
}

impl ScipPtr {
    pub(crate) fn new() -> Result<Self, Retcode> {
        let mut scip_ptr = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreate(scip_ptr.as_mut_ptr()));
        let scip_ptr = unsafe { scip_ptr.assume_init() };
        Ok(ScipPtr {
            raw: scip_ptr,
            vars: Vec::new(),
            conss: Vec::new(),
        })
    }

    pub(crate) fn include_default_plugins(&self) -> Result<(), Retcode> {
        scip_call!(ffi::SCIPincludeDefaultPlugins(self.raw));
        Ok(())
    }

    pub(crate) fn set_int_param(&self, param: &str, value: i32) -> Result<(), Retcode> {
        let param = c_string(param)?;
        scip_call! { ffi::SCIPsetIntParam(self.raw, param.as_ptr(), value) };
        Ok(())
    }

    pub(crate) fn set_real_param(&self, param: &str, value: f64) -> Result<(), Retcode> {
        let param = c_string(param)?;
        scip_call! { ffi::SCIPsetRealParam(self.raw, param.as_ptr(), value) };
        Ok(())
    }

    pub(crate) fn set_presolving(&self, presolving: ParamSetting) -> Result<(), Retcode> {
        scip_call! { ffi::SCIPsetPresolving(self.raw, presolving.into(), true.into()) };
        Ok(())
    }

    pub(crate) fn set_separating(&self, separating: ParamSetting) -> Result<(), Retcode> {
        scip_call! { ffi::SCIPsetSeparating(self.raw, separating.into(), true.into()) };
        Ok(())
    }

    pub(crate) fn set_heuristics(&self, heuristics: ParamSetting) -> Result<(), Retcode> {
        scip_call! { ffi::SCIPsetHeuristics(self.raw, heuristics.into(), true.into()) };
        Ok(())
    }

    pub(crate) fn create_prob(&self, name: &str) -> Result<(), Retcode> {
        let name = c_string(name)?;
        scip_call!(ffi::SCIPcreateProbBasic(self.raw, name.as_ptr()));
        Ok(())
    }

    pub(crate) fn set_obj_sense(&self, sense: Sense) -> Result<(), Retcode> {
        scip_call!(ffi::SCIPsetObjsense(self.raw, sense.into()));
        Ok(())
    }

    /// Clamps `value` into SCIP's `[-infinity, infinity]`.
    fn clamp_inf(&self, value: f64) -> f64 {
        let inf = unsafe { ffi::SCIPinfinity(self.raw) };
        value.clamp(-inf, inf)
    }

    pub(crate) fn status(&self) -> Status {
        let status = unsafe { ffi::SCIPgetStatus(self.raw) };
        status.into()
    }

    /// Creates a variable, adds it to the problem and keeps a capture of it until drop.
    pub(crate) fn create_var(
        &mut self,
        lb: f64,
        ub: f64,
        obj: f64,
        name: &str,
        kind: VarKind,
    ) -> Result<*mut SCIP_Var, Retcode> {
        let name = c_string(name)?;
        let mut var_ptr = MaybeUninit::uninit();
        scip_call! { ffi::SCIPcreateVarBasic(
            self.raw,
            var_ptr.as_mut_ptr(),
            name.as_ptr(),
            self.clamp_inf(lb),
            self.clamp_inf(ub),
            obj,
            kind.into(),
        ) };
        let var_ptr = unsafe { var_ptr.assume_init() };
        self.vars.push(var_ptr);
        scip_call! { ffi::SCIPaddVar(self.raw, var_ptr) };
        Ok(var_ptr)
    }

    /// Creates a linear constraint `lhs <= sum(coefs * vars) <= rhs` and adds it to the problem.
    pub(crate) fn create_cons(
        &mut self,
        vars: &[*mut SCIP_Var],
        coefs: &[f64],
        lhs: f64,
        rhs: f64,
        name: &str,
    ) -> Result<*mut SCIP_Cons, Retcode> {
        assert_eq!(vars.len(), coefs.len());
        let c_name = c_string(name)?;
        let mut scip_cons = MaybeUninit::uninit();
        scip_call! { ffi::SCIPcreateConsBasicLinear(
            self.raw,
            scip_cons.as_mut_ptr(),
            c_name.as_ptr(),
            0,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            self.clamp_inf(lhs),
            self.clamp_inf(rhs),
        ) };
        let scip_cons = unsafe { scip_cons.assume_init() };
        self.conss.push(scip_cons);
        for (var, coef) in vars.iter().zip(coefs) {
            scip_call! { ffi::SCIPaddCoefLinear(self.raw, scip_cons, *var, *coef) };
        }
        scip_call! { ffi::SCIPaddCons(self.raw, scip_cons) };
        Ok(scip_cons)
    }

    pub(crate) fn solve(&self) -> Result<(), Retcode> {
        scip_call!(ffi::SCIPsolve(self.raw));
        Ok(())
    }

    pub(crate) fn n_sols(&self) -> usize {
        unsafe { ffi::SCIPgetNSols(self.raw) as usize }
    }

    pub(crate) fn best_sol(&self) -> Option<*mut SCIP_SOL> {
        if self.n_sols() == 0 {
            return None;
        }
        Some(unsafe { ffi::SCIPgetBestSol(self.raw) })
    }

    pub(crate) fn sol_val(&self, sol: *mut SCIP_SOL, var: *mut SCIP_Var) -> f64 {
        unsafe { ffi::SCIPgetSolVal(self.raw, sol, var) }
    }

    pub(crate) fn sol_obj_val(&self, sol: *mut SCIP_SOL) -> f64 {
        unsafe { ffi::SCIPgetSolOrigObj(self.raw, sol) }
    }

    /// Dual value of a linear constraint in the last solved LP.
    ///
    /// Only meaningful after solving a pure LP with presolving disabled, otherwise the
    /// transformed constraint may be gone or the root LP may not be the final one.
    pub(crate) fn dual_sol_linear(&self, cons: *mut SCIP_Cons) -> Result<f64, Retcode> {
        let is_transformed = unsafe { ffi::SCIPconsIsTransformed(cons) } != 0;
        let cons_ptr = if is_transformed {
            cons
        } else {
            let mut transformed = MaybeUninit::<*mut SCIP_Cons>::uninit();
            scip_call!(ffi::SCIPgetTransformedCons(
                self.raw,
                cons,
                transformed.as_mut_ptr()
            ));
            unsafe { transformed.assume_init() }
        };
        if cons_ptr.is_null() {
            // the constraint never made it into the transformed problem, so its row is not tight
            return Ok(0.0);
        }
        Ok(unsafe { ffi::SCIPgetDualsolLinear(self.raw, cons_ptr) })
    }
}

impl Drop for ScipPtr {
    fn drop(&mut self) {
        // every created variable and constraint holds one capture of ours, release them
        // before freeing the SCIP instance
        for var_ptr in self.vars.iter_mut() {
            scip_call_panic!(ffi::SCIPreleaseVar(self.raw, var_ptr));
        }
        for cons_ptr in self.conss.iter_mut() {
            scip_call_panic!(ffi::SCIPreleaseCons(self.raw, cons_ptr));
        }
        unsafe { ffi::SCIPfree(&mut self.raw) };
    }
}

/// Emphasis setting for a group of SCIP parameters. Only switching a group off is needed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ParamSetting {
    Off,
}

impl From<ParamSetting> for ffi::SCIP_PARAMSETTING {
    fn from(val: ParamSetting) -> Self {
        match val {
            ParamSetting::Off => ffi::SCIP_ParamSetting_SCIP_PARAMSETTING_OFF,
        }
    }
}

impl From<Sense> for ffi::SCIP_OBJSENSE {
    fn from(val: Sense) -> Self {
        match val {
            Sense::Maximize => ffi::SCIP_Objsense_SCIP_OBJSENSE_MAXIMIZE,
            Sense::Minimize => ffi::SCIP_Objsense_SCIP_OBJSENSE_MINIMIZE,
        }
    }
}

impl From<VarKind> for ffi::SCIP_Vartype {
    fn from(val: VarKind) -> Self {
        match val {
            VarKind::Continuous => ffi::SCIP_Vartype_SCIP_VARTYPE_CONTINUOUS,
            VarKind::Integer => ffi::SCIP_Vartype_SCIP_VARTYPE_INTEGER,
        }
    }
}
