//! Core Kernel - Foundational types and utilities for the metering system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Temporal types for consumption windows and reading timestamps
//! - Common identifiers and value objects
//! - Port infrastructure for the adapter seam

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{ConsumptionWindow, Timezone, TemporalError, parse_reading_timestamp};
pub use identifiers::{ConsumerId, BillId, PaymentId, ReadingId};
pub use ports::{PortError, DomainPort};
