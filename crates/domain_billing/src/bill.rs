//! Bill lifecycle
//!
//! A bill is a monetary obligation computed from a consumer's consumption
//! window. It is created Pending and mutated exactly once, by a successful
//! payment transitioning it to Paid. Bills are never deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, ConsumerId, ConsumptionWindow, Money};
use domain_metering::MeterSerial;

use crate::error::BillingError;

/// Bill status state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Generated, awaiting payment (initial)
    Pending,
    /// Fully settled by one successful payment (terminal)
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Paid => "paid",
        }
    }
}

/// A bill over one consumption window for one consumer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,
    /// Consumer being billed
    pub consumer_id: ConsumerId,
    /// Meter whose consumption was aggregated
    pub meter_serial: MeterSerial,
    /// Billing period (inclusive dates)
    pub period: ConsumptionWindow,
    /// Total consumption over the period, kWh
    pub total_kwh: Decimal,
    /// Amount due, computed by the tariff
    pub amount_due: Money,
    /// Lifecycle status
    pub status: BillStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Creates a new bill in Pending status
    pub fn new(
        consumer_id: ConsumerId,
        meter_serial: MeterSerial,
        period: ConsumptionWindow,
        total_kwh: Decimal,
        amount_due: Money,
    ) -> Self {
        Self {
            id: BillId::new_v7(),
            consumer_id,
            meter_serial,
            period,
            total_kwh,
            amount_due,
            status: BillStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, BillStatus::Pending)
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.status, BillStatus::Paid)
    }

    /// Transitions the bill to Paid.
    ///
    /// Rejects a bill that has already reached the terminal state.
    pub fn mark_paid(&mut self) -> Result<(), BillingError> {
        if self.is_paid() {
            return Err(BillingError::AlreadyPaid(self.id.to_string()));
        }
        self.status = BillStatus::Paid;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use core_kernel::Currency;

    fn bill() -> Bill {
        let period = ConsumptionWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        Bill::new(
            ConsumerId::new(),
            MeterSerial::new("MTR-001"),
            period,
            dec!(25),
            Money::new(dec!(3.75), Currency::USD),
        )
    }

    #[test]
    fn test_bill_starts_pending() {
        let bill = bill();
        assert!(bill.is_pending());
        assert!(bill.id.to_string().starts_with("BIL-"));
    }

    #[test]
    fn test_mark_paid_is_one_way() {
        let mut bill = bill();

        bill.mark_paid().unwrap();
        assert!(bill.is_paid());

        let second = bill.mark_paid();
        assert!(matches!(second, Err(BillingError::AlreadyPaid(_))));
        assert!(bill.is_paid());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&BillStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(BillStatus::Paid.as_str(), "paid");
    }
}
