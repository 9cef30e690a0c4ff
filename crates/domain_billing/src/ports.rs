//! Billing Domain Ports
//!
//! The `BillStore` port covers bill persistence, point and filtered reads,
//! and the atomic settle operation the payment state machine relies on.
//! `infra_db` implements it over PostgreSQL with a conditional single-row
//! update; the in-memory mock serializes settles behind one mutex.

use async_trait::async_trait;

use core_kernel::{BillId, ConsumerId, DomainPort, PortError};

use crate::bill::Bill;
use crate::payment::Payment;

/// Result of an atomic settle attempt
///
/// The losing side of a payment race must observe `AlreadyPaid` or
/// `NotFound`, never a silent overwrite.
#[derive(Debug, Clone)]
pub enum SettleOutcome {
    /// The bill transitioned Pending → Paid and the payment was recorded
    Settled(Bill),
    /// The bill had already reached Paid
    AlreadyPaid,
    /// No bill with this identifier exists
    NotFound,
}

/// Persistent store for bills and payments
#[async_trait]
pub trait BillStore: DomainPort {
    /// Appends a newly generated bill
    async fn insert(&self, bill: &Bill) -> Result<(), PortError>;

    /// Point lookup by bill identifier
    async fn find_by_id(&self, id: BillId) -> Result<Option<Bill>, PortError>;

    /// All bills for a consumer, newest first
    async fn find_by_consumer(&self, consumer_id: ConsumerId) -> Result<Vec<Bill>, PortError>;

    /// All bills currently in Pending status
    async fn find_pending(&self) -> Result<Vec<Bill>, PortError>;

    /// Atomically transitions the bill Pending → Paid and records the
    /// payment. Implementations must guarantee that concurrent settles of
    /// the same bill admit at most one `Settled` outcome.
    async fn settle(&self, bill_id: BillId, payment: &Payment) -> Result<SettleOutcome, PortError>;

    /// Payments recorded against a bill (zero or one successful)
    async fn payments_for(&self, bill_id: BillId) -> Result<Vec<Payment>, PortError>;
}

/// In-memory mock adapter for testing without a database
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Inner {
        bills: HashMap<BillId, Bill>,
        payments: Vec<Payment>,
    }

    /// In-memory mock implementation of [`BillStore`]
    ///
    /// One mutex guards bills and payments together, so a settle is a
    /// single critical section and races serialize the same way the
    /// database transaction does.
    #[derive(Debug, Default)]
    pub struct InMemoryBillStore {
        inner: Mutex<Inner>,
    }

    impl InMemoryBillStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of recorded payments, for asserting at-most-one semantics
        pub fn payment_count(&self) -> usize {
            self.inner.lock().unwrap().payments.len()
        }
    }

    impl DomainPort for InMemoryBillStore {}

    #[async_trait]
    impl BillStore for InMemoryBillStore {
        async fn insert(&self, bill: &Bill) -> Result<(), PortError> {
            let mut inner = self.inner.lock().unwrap();
            inner.bills.insert(bill.id, bill.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: BillId) -> Result<Option<Bill>, PortError> {
            Ok(self.inner.lock().unwrap().bills.get(&id).cloned())
        }

        async fn find_by_consumer(&self, consumer_id: ConsumerId) -> Result<Vec<Bill>, PortError> {
            let inner = self.inner.lock().unwrap();
            let mut bills: Vec<Bill> = inner
                .bills
                .values()
                .filter(|b| b.consumer_id == consumer_id)
                .cloned()
                .collect();
            bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(bills)
        }

        async fn find_pending(&self) -> Result<Vec<Bill>, PortError> {
            let inner = self.inner.lock().unwrap();
            let mut bills: Vec<Bill> = inner
                .bills
                .values()
                .filter(|b| b.is_pending())
                .cloned()
                .collect();
            bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(bills)
        }

        async fn settle(
            &self,
            bill_id: BillId,
            payment: &Payment,
        ) -> Result<SettleOutcome, PortError> {
            let mut inner = self.inner.lock().unwrap();
            let Some(bill) = inner.bills.get_mut(&bill_id) else {
                return Ok(SettleOutcome::NotFound);
            };
            if bill.mark_paid().is_err() {
                return Ok(SettleOutcome::AlreadyPaid);
            }
            let settled = bill.clone();
            inner.payments.push(payment.clone());
            Ok(SettleOutcome::Settled(settled))
        }

        async fn payments_for(&self, bill_id: BillId) -> Result<Vec<Payment>, PortError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .payments
                .iter()
                .filter(|p| p.bill_id == bill_id)
                .cloned()
                .collect())
        }
    }
}
