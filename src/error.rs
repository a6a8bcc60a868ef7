use std::fmt;

use thiserror::Error;

use crate::solver::SolveError;

/// Problems with a cutting stock instance, detected before anything is solved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("stock width must be positive and finite, got {0}")]
    NonPositiveStockWidth(f64),

    #[error("instance has no piece widths")]
    Empty,

    #[error("piece width #{index} must be positive and finite, got {width}")]
    NonPositiveWidth { index: usize, width: f64 },

    #[error("piece width #{index} ({width}) exceeds the stock width {stock_width}")]
    WidthExceedsStock {
        index: usize,
        width: f64,
        stock_width: f64,
    },

    #[error("piece widths #{first} and #{second} are both {width}")]
    DuplicateWidth {
        first: usize,
        second: usize,
        width: f64,
    },

    #[error("piece width #{index} ({width}) fits more than u32::MAX times into {stock_width}")]
    TooManyPieces {
        index: usize,
        width: f64,
        stock_width: f64,
    },

    #[error("{widths} piece widths but {demands} demands")]
    LengthMismatch { widths: usize, demands: usize },
}

/// The solve that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RestrictedMaster,
    Pricing,
    FinalMaster,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RestrictedMaster => "restricted master problem",
            Stage::Pricing => "pricing subproblem",
            Stage::FinalMaster => "final integer master problem",
        };
        f.write_str(name)
    }
}

/// Everything that can make a cutting stock run fail. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutError {
    #[error("invalid instance: {0}")]
    InvalidInput(#[from] InputError),

    #[error("the {stage} is infeasible")]
    ModelInfeasible { stage: Stage },

    #[error("solving the {stage} failed")]
    Solver {
        stage: Stage,
        #[source]
        source: SolveError,
    },

    #[error(
        "column generation did not converge within {iterations} iterations \
         (last reduced cost {last_reduced_cost})"
    )]
    IterationLimit {
        iterations: usize,
        last_reduced_cost: f64,
    },
}

impl CutError {
    pub(crate) fn solver(stage: Stage, source: impl Into<SolveError>) -> Self {
        CutError::Solver {
            stage,
            source: source.into(),
        }
    }

    /// The stage that failed, if the failure came from a solve.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CutError::ModelInfeasible { stage } | CutError::Solver { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CutError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retcode::Retcode;
    use std::error::Error as _;

    #[test]
    fn solver_error_keeps_stage_and_source() {
        let err = CutError::solver(Stage::Pricing, Retcode::LpError);
        assert_eq!(err.stage(), Some(Stage::Pricing));
        assert_eq!(err.to_string(), "solving the pricing subproblem failed");
        let source = err.source().unwrap();
        assert!(source.to_string().contains("LpError"));
    }

    #[test]
    fn input_errors_have_no_stage() {
        let err: CutError = InputError::Empty.into();
        assert_eq!(err.stage(), None);
        assert!(err.to_string().contains("no piece widths"));
    }

    #[test]
    fn infeasible_message_names_stage() {
        let err = CutError::ModelInfeasible {
            stage: Stage::FinalMaster,
        };
        assert_eq!(err.to_string(), "the final integer master problem is infeasible");
    }
}
