//! Billing engine
//!
//! Orchestrates bill generation against aggregated consumption, read access
//! to persisted bills, and the pay transition. The engine holds its
//! collaborators as injected handles; nothing here owns process-wide state.

use std::sync::Arc;
use tracing::info;

use core_kernel::{BillId, ConsumerId, ConsumptionWindow};
use domain_metering::{CallerId, ConsumptionAggregator, MeterSerial};

use crate::bill::Bill;
use crate::error::BillingError;
use crate::payment::{Payment, PaymentMethod};
use crate::ports::{BillStore, SettleOutcome};
use crate::tariff::Tariff;

/// Service driving the bill lifecycle
pub struct BillingEngine {
    aggregator: Arc<ConsumptionAggregator>,
    tariff: Arc<dyn Tariff>,
    bills: Arc<dyn BillStore>,
}

impl BillingEngine {
    pub fn new(
        aggregator: Arc<ConsumptionAggregator>,
        tariff: Arc<dyn Tariff>,
        bills: Arc<dyn BillStore>,
    ) -> Self {
        Self {
            aggregator,
            tariff,
            bills,
        }
    }

    /// Generates a bill for the consumer's consumption over the window.
    ///
    /// Aggregates the meter's total (subject to the access policy, with the
    /// consumer as caller), prices it via the tariff, and persists the bill
    /// in Pending status. Like reading ingestion, generation carries no
    /// idempotency key: a retried request produces a second bill.
    pub async fn generate_bill(
        &self,
        consumer_id: ConsumerId,
        meter_serial: &MeterSerial,
        period: ConsumptionWindow,
    ) -> Result<Bill, BillingError> {
        let caller = CallerId::new(consumer_id.to_string());
        let total_kwh = self
            .aggregator
            .total_consumption(meter_serial, period, &caller)
            .await?;

        let amount_due = self.tariff.amount_due(total_kwh, &period);
        let bill = Bill::new(consumer_id, meter_serial.clone(), period, total_kwh, amount_due);
        self.bills.insert(&bill).await?;

        info!(bill = %bill.id, consumer = %consumer_id, meter = %meter_serial, %period, "generated bill");
        Ok(bill)
    }

    /// All bills for a consumer, newest first
    pub async fn get_consumer_bills(&self, consumer_id: ConsumerId) -> Result<Vec<Bill>, BillingError> {
        Ok(self.bills.find_by_consumer(consumer_id).await?)
    }

    /// Point lookup; absent bills are a value, not an error
    pub async fn get_bill_by_id(&self, bill_id: BillId) -> Result<Option<Bill>, BillingError> {
        Ok(self.bills.find_by_id(bill_id).await?)
    }

    /// Bills awaiting payment, for downstream collection workflows
    pub async fn get_pending_bills(&self) -> Result<Vec<Bill>, BillingError> {
        Ok(self.bills.find_pending().await?)
    }

    /// Payments recorded against a bill
    pub async fn get_bill_payments(&self, bill_id: BillId) -> Result<Vec<Payment>, BillingError> {
        Ok(self.bills.payments_for(bill_id).await?)
    }

    /// Records a payment and transitions the bill Pending → Paid.
    ///
    /// Fails with `BillNotFound` or `AlreadyPaid`; the transition and the
    /// payment record are atomic at the store, so concurrent attempts on the
    /// same bill admit exactly one success.
    pub async fn pay_bill(
        &self,
        bill_id: BillId,
        method: PaymentMethod,
    ) -> Result<Payment, BillingError> {
        let bill = self
            .bills
            .find_by_id(bill_id)
            .await?
            .ok_or_else(|| BillingError::BillNotFound(bill_id.to_string()))?;

        let payment = Payment::new(bill.id, bill.amount_due, method);
        match self.bills.settle(bill.id, &payment).await? {
            SettleOutcome::Settled(settled) => {
                info!(bill = %settled.id, payment = %payment.id, "bill paid");
                Ok(payment)
            }
            SettleOutcome::AlreadyPaid => Err(BillingError::AlreadyPaid(bill_id.to_string())),
            SettleOutcome::NotFound => Err(BillingError::BillNotFound(bill_id.to_string())),
        }
    }
}
