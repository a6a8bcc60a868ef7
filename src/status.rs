use crate::ffi;
use scip_sys::SCIP_Status;

/// How a SCIP solve ended.
///
/// Only `Optimal` yields values the cutting stock algorithm uses; the limit statuses can
/// only occur when a time limit is configured.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// Not known, also used for statuses this crate does not distinguish.
    Unknown,
    UserInterrupt,
    NodeLimit,
    TotalNodeLimit,
    StallNodeLimit,
    TimeLimit,
    MemoryLimit,
    GapLimit,
    SolutionLimit,
    BestSolutionLimit,
    RestartLimit,
    /// Proven optimal, the best solution is available.
    Optimal,
    Infeasible,
    Unbounded,
    /// Infeasible or unbounded, SCIP could not tell which.
    Inforunbd,
    /// SIGTERM received.
    Terminate,
}

impl From<SCIP_Status> for Status {
    fn from(val: SCIP_Status) -> Self {
        match val {
            ffi::SCIP_Status_SCIP_STATUS_USERINTERRUPT => Status::UserInterrupt,
            ffi::SCIP_Status_SCIP_STATUS_NODELIMIT => Status::NodeLimit,
            ffi::SCIP_Status_SCIP_STATUS_TOTALNODELIMIT => Status::TotalNodeLimit,
            ffi::SCIP_Status_SCIP_STATUS_STALLNODELIMIT => Status::StallNodeLimit,
            ffi::SCIP_Status_SCIP_STATUS_TIMELIMIT => Status::TimeLimit,
            ffi::SCIP_Status_SCIP_STATUS_MEMLIMIT => Status::MemoryLimit,
            ffi::SCIP_Status_SCIP_STATUS_GAPLIMIT => Status::GapLimit,
            ffi::SCIP_Status_SCIP_STATUS_SOLLIMIT => Status::SolutionLimit,
            ffi::SCIP_Status_SCIP_STATUS_BESTSOLLIMIT => Status::BestSolutionLimit,
            ffi::SCIP_Status_SCIP_STATUS_RESTARTLIMIT => Status::RestartLimit,
            ffi::SCIP_Status_SCIP_STATUS_OPTIMAL => Status::Optimal,
            ffi::SCIP_Status_SCIP_STATUS_INFEASIBLE => Status::Infeasible,
            ffi::SCIP_Status_SCIP_STATUS_UNBOUNDED => Status::Unbounded,
            ffi::SCIP_Status_SCIP_STATUS_INFORUNBD => Status::Inforunbd,
            ffi::SCIP_Status_SCIP_STATUS_TERMINATE => Status::Terminate,
            // newer SCIP releases add limit statuses; they all mean "stopped early"
            _ => Status::Unknown,
        }
    }
}

impl Status {
    /// Whether the run stopped because one of the configured limits was hit.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            Status::NodeLimit
                | Status::TotalNodeLimit
                | Status::StallNodeLimit
                | Status::TimeLimit
                | Status::MemoryLimit
                | Status::GapLimit
                | Status::SolutionLimit
                | Status::BestSolutionLimit
                | Status::RestartLimit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal() {
        assert_eq!(Status::from(ffi::SCIP_Status_SCIP_STATUS_OPTIMAL), Status::Optimal);
    }

    #[test]
    fn time_limit_is_a_limit() {
        let status = Status::from(ffi::SCIP_Status_SCIP_STATUS_TIMELIMIT);
        assert_eq!(status, Status::TimeLimit);
        assert!(status.is_limit());
    }

    #[test]
    fn infeasible_is_not_a_limit() {
        assert!(!Status::Infeasible.is_limit());
        assert!(!Status::Optimal.is_limit());
    }

    #[test]
    fn unknown() {
        assert_eq!(Status::from(ffi::SCIP_Status_SCIP_STATUS_UNKNOWN), Status::Unknown);
    }
}
