//! Metering Domain - Readings, Aggregation, and Access Policy
//!
//! This crate implements the consumption-side core of the metering system:
//!
//! - **Reading ingestion**: validates and persists one telemetry reading at a
//!   time. Ingestion is best-effort: business rejections and store failures
//!   report failure-to-record rather than raising.
//! - **Consumption aggregation**: per-reading listings and summed totals over
//!   an inclusive date window, gated by an access policy.
//! - **Access policy**: a single decision point deciding whether a caller may
//!   see a meter's data. The shipped policy grants access to any active meter
//!   and is explicitly a placeholder for a future ownership rule.
//!
//! Persistence and meter provisioning are reached through port traits
//! (`ReadingStore`, `MeterRegistry`); `infra_db` supplies the PostgreSQL
//! adapters and `ports::mock` supplies in-memory ones for tests.

pub mod meter;
pub mod reading;
pub mod ports;
pub mod access;
pub mod ingest;
pub mod aggregate;
pub mod error;

pub use meter::{Meter, MeterSerial, MeterStatus, MeterLookup};
pub use reading::{Reading, ReadingEntry};
pub use ports::{MeterRegistry, ReadingStore};
pub use access::{AccessPolicy, AccessDecision, ActiveMeterPolicy, CallerId};
pub use ingest::ReadingIngestor;
pub use aggregate::ConsumptionAggregator;
pub use error::MeteringError;
