//! Billing DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_billing::{Bill, Payment, PaymentMethod};

/// Request body for generating a bill
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateBillRequest {
    pub consumer_id: Uuid,
    #[validate(length(min = 1, message = "meter_serial must not be empty"))]
    pub meter_serial: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Request body for paying a bill
#[derive(Debug, Default, Deserialize)]
pub struct PayBillRequest {
    #[serde(default)]
    pub method: PaymentMethod,
}

/// Optional status filter for bill listings
#[derive(Debug, Deserialize)]
pub struct BillsQuery {
    pub status: Option<String>,
}

/// A bill as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct BillResponse {
    pub id: String,
    pub consumer_id: String,
    pub meter_serial: String,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub total_kwh: Decimal,
    pub amount_due: Decimal,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id.to_string(),
            consumer_id: bill.consumer_id.to_string(),
            meter_serial: bill.meter_serial.as_str().to_string(),
            period_from: bill.period.from,
            period_to: bill.period.to,
            total_kwh: bill.total_kwh,
            amount_due: bill.amount_due.amount(),
            currency: bill.amount_due.currency().code().to_string(),
            status: bill.status.as_str().to_string(),
            created_at: bill.created_at,
        }
    }
}

/// A payment as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub bill_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            bill_id: payment.bill_id.to_string(),
            amount: payment.amount.amount(),
            currency: payment.amount.currency().code().to_string(),
            method: payment.method.as_str().to_string(),
            paid_at: payment.paid_at,
        }
    }
}
