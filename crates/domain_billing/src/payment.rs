//! Payment recording
//!
//! A payment is a record of funds applied against a bill. It is created by
//! the pay operation and immutable thereafter; at most one successful
//! payment exists per bill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, Money, PaymentId};

/// Payment method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at a collection point
    #[default]
    Cash,
    /// Credit or debit card
    Card,
    /// Bank transfer
    BankTransfer,
    /// Cheque
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

/// A payment applied against a bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Bill being settled
    pub bill_id: BillId,
    /// Amount paid
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// When the payment was taken
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment record
    pub fn new(bill_id: BillId, amount: Money, method: PaymentMethod) -> Self {
        Self {
            id: PaymentId::new_v7(),
            bill_id,
            amount,
            method,
            paid_at: Utc::now(),
        }
    }
}
