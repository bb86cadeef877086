//! Error handlers
//!
//! Classifies service errors by operational severity and logs them at the
//! matching level. A release-phase lock timeout is the only critical case:
//! the guarded operation already ran and its lock record may be leaked,
//! blocking the key until it is cleared.

use log::{error, info, warn};

use crate::error::types::{LockError, LockPhase, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request was invalid or not permitted; retrying will not help.
    Rejected,
    /// The file is not lockable right now; retry later.
    Transient,
    /// Lock state may be inconsistent and needs attention.
    Critical,
}

pub fn severity(err: &ServiceError) -> Severity {
    match err {
        ServiceError::Lock(LockError::Timeout {
            phase: LockPhase::Release,
            ..
        }) => Severity::Critical,
        ServiceError::Lock(_) => Severity::Transient,
        ServiceError::Storage(_) => Severity::Critical,
        _ => Severity::Rejected,
    }
}

pub fn is_retryable(err: &ServiceError) -> bool {
    severity(err) == Severity::Transient
}

/// Log a service error at the level its severity calls for.
pub fn handle_error(err: &ServiceError) {
    match severity(err) {
        Severity::Rejected => info!("Request rejected: {}", err),
        Severity::Transient => warn!("Request deferred: {}", err),
        Severity::Critical => error!("File service error: {}", err),
    }
}
