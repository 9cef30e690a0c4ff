//! Repository implementations
//!
//! One repository per aggregate. Repositories speak in row types and
//! `DatabaseError`; the `adapters` module translates both to the domain.
//!
//! Queries are built at runtime (`sqlx::query_as` with `FromRow` rows)
//! rather than with the compile-time macros, so the workspace builds
//! without a live `DATABASE_URL`.

pub mod meter;
pub mod reading;
pub mod billing;

pub use meter::{MeterRepository, MeterRow, NewMeter};
pub use reading::{NewReading, ReadingRepository, ReadingRow};
pub use billing::{BillRepository, BillRow, NewBill, NewPayment, PaymentRow, SettleRow};
