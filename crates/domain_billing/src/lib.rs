//! Billing Domain - Bill Lifecycle and Payment Recording
//!
//! This crate drives the bill state machine against accumulated consumption:
//!
//! ```text
//! generate ──> Pending ──(pay)──> Paid (terminal)
//! ```
//!
//! No other transitions exist in this core; cancellation and refunds are out
//! of scope. A bill is generated from the consumption aggregator's total for
//! a window, priced by a [`Tariff`] collaborator, and settled by at most one
//! successful [`Payment`]. The settle operation is atomic at the store: when
//! two payment attempts race on the same bill, exactly one succeeds and the
//! loser observes a defined conflict.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingEngine, PaymentMethod};
//!
//! let bill = engine.generate_bill(consumer_id, &serial, window).await?;
//! let payment = engine.pay_bill(bill.id, PaymentMethod::Cash).await?;
//! ```

pub mod bill;
pub mod payment;
pub mod tariff;
pub mod ports;
pub mod engine;
pub mod error;

pub use bill::{Bill, BillStatus};
pub use payment::{Payment, PaymentMethod};
pub use tariff::{Tariff, FlatRateTariff};
pub use ports::{BillStore, SettleOutcome};
pub use engine::BillingEngine;
pub use error::BillingError;
