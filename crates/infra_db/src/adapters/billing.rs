//! PostgreSQL bill store adapter
//!
//! Implements the billing port over the bill repository, including the
//! transactional settle path behind [`SettleOutcome`].

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    BillId, ConsumerId, ConsumptionWindow, Currency, DomainPort, Money, PaymentId, PortError,
};
use domain_billing::{Bill, BillStatus, BillStore, Payment, PaymentMethod, SettleOutcome};
use domain_metering::MeterSerial;

use super::db_to_port_error;
use crate::repositories::billing::{
    BillRepository, BillRow, NewBill, NewPayment, PaymentRow, SettleRow,
};

/// PostgreSQL-backed implementation of the [`BillStore`] port
#[derive(Debug, Clone)]
pub struct PostgresBillStore {
    repository: BillRepository,
}

impl PostgresBillStore {
    /// Creates a new PostgreSQL bill store adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BillRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresBillStore {}

#[async_trait]
impl BillStore for PostgresBillStore {
    #[instrument(skip(self, bill), fields(bill = %bill.id))]
    async fn insert(&self, bill: &Bill) -> Result<(), PortError> {
        debug!("inserting bill");

        self.repository
            .insert(NewBill {
                bill_id: *bill.id.as_uuid(),
                consumer_id: *bill.consumer_id.as_uuid(),
                meter_serial: bill.meter_serial.as_str().to_string(),
                period_from: bill.period.from,
                period_to: bill.period.to,
                total_kwh: bill.total_kwh,
                amount_due: bill.amount_due.amount(),
                currency: bill.amount_due.currency().code().to_string(),
                status: bill.status.as_str().to_string(),
                created_at: bill.created_at,
            })
            .await
            .map_err(db_to_port_error)
    }

    async fn find_by_id(&self, id: BillId) -> Result<Option<Bill>, PortError> {
        let row = self
            .repository
            .find_by_id(*id.as_uuid())
            .await
            .map_err(db_to_port_error)?;

        row.map(row_to_bill).transpose()
    }

    async fn find_by_consumer(&self, consumer_id: ConsumerId) -> Result<Vec<Bill>, PortError> {
        let rows = self
            .repository
            .find_by_consumer(*consumer_id.as_uuid())
            .await
            .map_err(db_to_port_error)?;

        rows.into_iter().map(row_to_bill).collect()
    }

    async fn find_pending(&self) -> Result<Vec<Bill>, PortError> {
        let rows = self
            .repository
            .find_pending()
            .await
            .map_err(db_to_port_error)?;

        rows.into_iter().map(row_to_bill).collect()
    }

    #[instrument(skip(self, payment), fields(bill = %bill_id))]
    async fn settle(&self, bill_id: BillId, payment: &Payment) -> Result<SettleOutcome, PortError> {
        debug!("settling bill");

        let outcome = self
            .repository
            .settle(
                *bill_id.as_uuid(),
                NewPayment {
                    payment_id: *payment.id.as_uuid(),
                    bill_id: *payment.bill_id.as_uuid(),
                    amount: payment.amount.amount(),
                    currency: payment.amount.currency().code().to_string(),
                    method: payment.method.as_str().to_string(),
                    paid_at: payment.paid_at,
                },
            )
            .await
            .map_err(db_to_port_error)?;

        Ok(match outcome {
            SettleRow::Settled(row) => SettleOutcome::Settled(row_to_bill(row)?),
            SettleRow::AlreadyPaid => SettleOutcome::AlreadyPaid,
            SettleRow::NotFound => SettleOutcome::NotFound,
        })
    }

    async fn payments_for(&self, bill_id: BillId) -> Result<Vec<Payment>, PortError> {
        let rows = self
            .repository
            .payments_for(*bill_id.as_uuid())
            .await
            .map_err(db_to_port_error)?;

        rows.into_iter().map(row_to_payment).collect()
    }
}

fn row_to_bill(row: BillRow) -> Result<Bill, PortError> {
    let period = ConsumptionWindow::new(row.period_from, row.period_to)
        .map_err(|e| PortError::internal(format!("stored bill period invalid: {e}")))?;
    let currency = parse_currency(&row.currency)?;

    Ok(Bill {
        id: BillId::from_uuid(row.bill_id),
        consumer_id: ConsumerId::from_uuid(row.consumer_id),
        meter_serial: MeterSerial::new(row.meter_serial),
        period,
        total_kwh: row.total_kwh,
        amount_due: Money::new(row.amount_due, currency),
        status: status_from_db(&row.status)?,
        created_at: row.created_at,
    })
}

fn row_to_payment(row: PaymentRow) -> Result<Payment, PortError> {
    let currency = parse_currency(&row.currency)?;

    Ok(Payment {
        id: PaymentId::from_uuid(row.payment_id),
        bill_id: BillId::from_uuid(row.bill_id),
        amount: Money::new(row.amount, currency),
        method: method_from_db(&row.method)?,
        paid_at: row.paid_at,
    })
}

fn parse_currency(code: &str) -> Result<Currency, PortError> {
    Currency::from_str(code)
        .map_err(|_| PortError::internal(format!("unknown stored currency '{code}'")))
}

fn status_from_db(status: &str) -> Result<BillStatus, PortError> {
    match status {
        "pending" => Ok(BillStatus::Pending),
        "paid" => Ok(BillStatus::Paid),
        other => Err(PortError::internal(format!(
            "unknown bill status '{other}'"
        ))),
    }
}

fn method_from_db(method: &str) -> Result<PaymentMethod, PortError> {
    match method {
        "cash" => Ok(PaymentMethod::Cash),
        "card" => Ok(PaymentMethod::Card),
        "bank_transfer" => Ok(PaymentMethod::BankTransfer),
        "cheque" => Ok(PaymentMethod::Cheque),
        other => Err(PortError::internal(format!(
            "unknown payment method '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn bill_row() -> BillRow {
        BillRow {
            bill_id: Uuid::new_v4(),
            consumer_id: Uuid::new_v4(),
            meter_serial: "MTR-001".to_string(),
            period_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_to: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            total_kwh: dec!(25),
            amount_due: dec!(3.75),
            currency: "USD".to_string(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_bill_maps_all_fields() {
        let row = bill_row();
        let bill = row_to_bill(row.clone()).unwrap();

        assert_eq!(*bill.id.as_uuid(), row.bill_id);
        assert_eq!(bill.total_kwh, dec!(25));
        assert_eq!(bill.amount_due.amount(), dec!(3.75));
        assert_eq!(bill.amount_due.currency(), Currency::USD);
        assert!(bill.is_pending());
    }

    #[test]
    fn test_row_to_bill_rejects_unknown_status() {
        let mut row = bill_row();
        row.status = "void".to_string();
        assert!(row_to_bill(row).is_err());
    }

    #[test]
    fn test_method_from_db_round_trips() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::BankTransfer,
            PaymentMethod::Cheque,
        ] {
            assert_eq!(method_from_db(method.as_str()).unwrap(), method);
        }
    }
}
