use crate::ffi;

/// Return codes of the SCIP C-API, as seen by the SCIP backend.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Retcode {
    /// Normal termination.
    Okay,
    /// Unspecified error.
    Error,
    /// Insufficient memory error.
    NoMemory,
    /// Read error.
    ReadError,
    /// Write error.
    WriteError,
    /// File not found error.
    NoFile,
    /// Cannot create file.
    FileCreateError,
    /// Error in LP solver.
    LpError,
    /// No problem exists.
    NoProblem,
    /// Method cannot be called at this time in the solution process.
    InvalidCall,
    /// Error in input data.
    InvalidData,
    /// Method returned an invalid result code.
    InvalidResult,
    /// A required plugin was not found.
    PluginNotFound,
    /// The parameter with the given name was not found.
    ParameterUnknown,
    /// The parameter is not of the expected type.
    ParameterWrongType,
    /// The value is invalid for the given parameter.
    ParameterWrongVal,
    /// The given key is already existing in the table.
    KeyAlreadyExisting,
    /// Maximal branching depth level exceeded.
    MaxDepthLevel,
    /// No branching could be created.
    BranchError,
    /// Function not implemented.
    NotImplemented,
    /// A return code this crate does not know about.
    Unknown(ffi::SCIP_Retcode),
}

impl From<ffi::SCIP_Retcode> for Retcode {
    fn from(val: ffi::SCIP_Retcode) -> Self {
        match val {
            ffi::SCIP_Retcode_SCIP_OKAY => Retcode::Okay,
            ffi::SCIP_Retcode_SCIP_ERROR => Retcode::Error,
            ffi::SCIP_Retcode_SCIP_NOMEMORY => Retcode::NoMemory,
            ffi::SCIP_Retcode_SCIP_READERROR => Retcode::ReadError,
            ffi::SCIP_Retcode_SCIP_WRITEERROR => Retcode::WriteError,
            ffi::SCIP_Retcode_SCIP_NOFILE => Retcode::NoFile,
            ffi::SCIP_Retcode_SCIP_FILECREATEERROR => Retcode::FileCreateError,
            ffi::SCIP_Retcode_SCIP_LPERROR => Retcode::LpError,
            ffi::SCIP_Retcode_SCIP_NOPROBLEM => Retcode::NoProblem,
            ffi::SCIP_Retcode_SCIP_INVALIDCALL => Retcode::InvalidCall,
            ffi::SCIP_Retcode_SCIP_INVALIDDATA => Retcode::InvalidData,
            ffi::SCIP_Retcode_SCIP_INVALIDRESULT => Retcode::InvalidResult,
            ffi::SCIP_Retcode_SCIP_PLUGINNOTFOUND => Retcode::PluginNotFound,
            ffi::SCIP_Retcode_SCIP_PARAMETERUNKNOWN => Retcode::ParameterUnknown,
            ffi::SCIP_Retcode_SCIP_PARAMETERWRONGTYPE => Retcode::ParameterWrongType,
            ffi::SCIP_Retcode_SCIP_PARAMETERWRONGVAL => Retcode::ParameterWrongVal,
            ffi::SCIP_Retcode_SCIP_KEYALREADYEXISTING => Retcode::KeyAlreadyExisting,
            ffi::SCIP_Retcode_SCIP_MAXDEPTHLEVEL => Retcode::MaxDepthLevel,
            ffi::SCIP_Retcode_SCIP_BRANCHERROR => Retcode::BranchError,
            ffi::SCIP_Retcode_SCIP_NOTIMPLEMENTED => Retcode::NotImplemented,
            other => Retcode::Unknown(other),
        }
    }
}

impl std::fmt::Display for Retcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Retcode::Unknown(code) => write!(f, "unknown SCIP return code {code}"),
            known => write!(f, "SCIP returned {known:?}"),
        }
    }
}

impl std::error::Error for Retcode {}

/// Evaluates a SCIP C-API call and returns early with the `Retcode` if it is not `Okay`.
macro_rules! scip_call {
    ($res:expr) => {
        let res = unsafe { $res };
        let retcode = $crate::retcode::Retcode::from(res);
        if retcode != $crate::retcode::Retcode::Okay {
            return Err(retcode.into());
        }
    };
}

/// Like `scip_call!`, for contexts that cannot propagate an error (`Drop`).
macro_rules! scip_call_panic {
    ($res:expr) => {
        let res = unsafe { $res };
        let retcode = $crate::retcode::Retcode::from(res);
        if retcode != $crate::retcode::Retcode::Okay {
            panic!("SCIP call failed with retcode {:?}", retcode);
        }
    };
}

pub(crate) use scip_call;
pub(crate) use scip_call_panic;
