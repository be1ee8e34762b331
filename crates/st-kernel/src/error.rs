use st_core::{ProcessId, ResourceId};
use thiserror::Error;

/// Kernel protocol violations.
///
/// Apart from `InvalidDuration` (which a bad configuration can trigger),
/// every variant means the caller broke the acquire/release protocol.  None
/// of them are recoverable; the station aborts the run.
#[derive(Debug, Error, PartialEq)]
pub enum KernelError {
    #[error("invalid duration {duration}: delays must be non-negative")]
    InvalidDuration { duration: f64 },

    #[error("{holder} released {resource} without holding it")]
    NotHolder {
        resource: ResourceId,
        holder:   ProcessId,
    },

    #[error("{holder} requested {resource} while already holding it")]
    AlreadyHolder {
        resource: ResourceId,
        holder:   ProcessId,
    },

    #[error("{0} already has an outstanding request")]
    AlreadyWaiting(ProcessId),

    #[error("{0} does not exist in this resource table")]
    UnknownResource(ResourceId),
}

pub type KernelResult<T> = Result<T, KernelError>;
