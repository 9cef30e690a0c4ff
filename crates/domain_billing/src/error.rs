//! Billing domain errors

use thiserror::Error;

use core_kernel::PortError;
use domain_metering::MeteringError;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Bill not found
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Payment attempted on a bill that already reached Paid
    #[error("Bill already paid: {0}")]
    AlreadyPaid(String),

    /// Aggregation failed while generating a bill (includes access denial)
    #[error("Consumption aggregation failed: {0}")]
    Metering(#[from] MeteringError),

    /// Underlying store failure
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl BillingError {
    /// Returns true if this is the payment-conflict signal
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BillingError::AlreadyPaid(_) | BillingError::BillNotFound(_)
        )
    }
}
