//! Billing repository implementation
//!
//! Database access for bills and payments. The settle path is the one
//! write that must be race-safe: a conditional status flip and the payment
//! insert run in a single transaction, so two payment attempts on the same
//! bill serialize at the row lock and exactly one observes the transition.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for bills and their payments
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    /// Creates a new BillRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a newly generated bill
    pub async fn insert(&self, bill: NewBill) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO bills (
                bill_id, consumer_id, meter_serial, period_from, period_to,
                total_kwh, amount_due, currency, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(bill.bill_id)
        .bind(bill.consumer_id)
        .bind(&bill.meter_serial)
        .bind(bill.period_from)
        .bind(bill.period_to)
        .bind(bill.total_kwh)
        .bind(bill.amount_due)
        .bind(&bill.currency)
        .bind(&bill.status)
        .bind(bill.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }

    /// Point lookup by bill identifier
    pub async fn find_by_id(&self, bill_id: Uuid) -> Result<Option<BillRow>, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT bill_id, consumer_id, meter_serial, period_from, period_to,
                   total_kwh, amount_due, currency, status, created_at
            FROM bills
            WHERE bill_id = $1
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }

    /// All bills for a consumer, newest first
    pub async fn find_by_consumer(&self, consumer_id: Uuid) -> Result<Vec<BillRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT bill_id, consumer_id, meter_serial, period_from, period_to,
                   total_kwh, amount_due, currency, status, created_at
            FROM bills
            WHERE consumer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(consumer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }

    /// All bills in pending status, newest first
    pub async fn find_pending(&self) -> Result<Vec<BillRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, BillRow>(
            r#"
            SELECT bill_id, consumer_id, meter_serial, period_from, period_to,
                   total_kwh, amount_due, currency, status, created_at
            FROM bills
            WHERE status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }

    /// Atomically flips the bill to paid and records the payment.
    ///
    /// The UPDATE carries `AND status = 'pending'`, so only one of any
    /// set of racing transactions sees an affected row; the losers fall
    /// through to the existence check.
    pub async fn settle(
        &self,
        bill_id: Uuid,
        payment: NewPayment,
    ) -> Result<SettleRow, DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let updated = sqlx::query_as::<_, BillRow>(
            r#"
            UPDATE bills
            SET status = 'paid'
            WHERE bill_id = $1 AND status = 'pending'
            RETURNING bill_id, consumer_id, meter_serial, period_from, period_to,
                      total_kwh, amount_due, currency, status, created_at
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        let Some(bill) = updated else {
            tx.rollback()
                .await
                .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

            let exists = sqlx::query_scalar::<_, bool>(
                r#"SELECT EXISTS(SELECT 1 FROM bills WHERE bill_id = $1)"#,
            )
            .bind(bill_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

            return Ok(if exists {
                SettleRow::AlreadyPaid
            } else {
                SettleRow::NotFound
            });
        };

        sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, bill_id, amount, currency, method, paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payment.payment_id)
        .bind(payment.bill_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.method)
        .bind(payment.paid_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(SettleRow::Settled(bill))
    }

    /// Payments recorded against a bill, oldest first
    pub async fn payments_for(&self, bill_id: Uuid) -> Result<Vec<PaymentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT payment_id, bill_id, amount, currency, method, paid_at
            FROM payments
            WHERE bill_id = $1
            ORDER BY paid_at ASC
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }
}

/// Row-level outcome of a settle attempt
#[derive(Debug, Clone)]
pub enum SettleRow {
    Settled(BillRow),
    AlreadyPaid,
    NotFound,
}

/// Database row for a bill
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub bill_id: Uuid,
    pub consumer_id: Uuid,
    pub meter_serial: String,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub total_kwh: Decimal,
    pub amount_due: Decimal,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Database row for a payment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}

/// Data for inserting a new bill
#[derive(Debug, Clone)]
pub struct NewBill {
    pub bill_id: Uuid,
    pub consumer_id: Uuid,
    pub meter_serial: String,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub total_kwh: Decimal,
    pub amount_due: Decimal,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Data for recording a new payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub payment_id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}
