//! Metering domain errors

use thiserror::Error;

use core_kernel::{PortError, TemporalError};

/// Errors that can occur in the metering domain
///
/// Validation and not-found/inactive conditions are expected outcomes and
/// surface as values (`Ok(false)`, empty listings) on the paths the public
/// contract defines; these variants cover the conditions that must remain
/// distinguishable to callers.
#[derive(Debug, Error)]
pub enum MeteringError {
    /// Reading timestamp text could not be parsed; distinct from a
    /// business-rule rejection
    #[error("Unparseable reading timestamp: {0}")]
    InvalidTimestamp(#[from] TemporalError),

    /// The access policy refused the caller; distinct from "no data"
    #[error("Access denied for caller '{caller}' on meter '{meter}'")]
    AccessDenied { meter: String, caller: String },

    /// Underlying store failure on a read path; propagated, not swallowed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl MeteringError {
    pub fn access_denied(meter: impl std::fmt::Display, caller: impl std::fmt::Display) -> Self {
        MeteringError::AccessDenied {
            meter: meter.to_string(),
            caller: caller.to_string(),
        }
    }

    /// Returns true if this error is the authorization-denied signal
    pub fn is_access_denied(&self) -> bool {
        matches!(self, MeteringError::AccessDenied { .. })
    }
}
