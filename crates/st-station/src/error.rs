use st_core::ProcessId;
use st_kernel::KernelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("unrecognized route {0:?}")]
    UnrecognizedRoute(String),

    #[error("{0} was never submitted to this station")]
    UnknownProcess(ProcessId),

    #[error("no process ids left for another train")]
    ProcessLimit,

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}

pub type StationResult<T> = Result<T, StationError>;
