//! Metering Domain Ports
//!
//! Port interfaces for the collaborators this domain consumes, enabling
//! swappable implementations:
//!
//! - **Internal adapters**: PostgreSQL-backed, in `infra_db`
//! - **Mock adapters**: in-memory, in [`mock`], for tests
//!
//! Services receive ports as `Arc<dyn …>` parameters; no ambient store
//! handle exists anywhere in the core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, PortError};

use crate::meter::{MeterLookup, MeterSerial};
use crate::reading::Reading;

/// Resolves meter serial numbers against the provisioning registry
///
/// Must be a point, low-latency lookup. The registry is owned by an external
/// provisioning process; this core only reads it.
#[async_trait]
pub trait MeterRegistry: DomainPort {
    /// Resolves a serial number to its registry state
    async fn lookup(&self, serial: &MeterSerial) -> Result<MeterLookup, PortError>;

    /// Collapsed convenience check: meter exists and is active
    async fn is_active(&self, serial: &MeterSerial) -> Result<bool, PortError> {
        Ok(self.lookup(serial).await?.is_active())
    }
}

/// Append and range-query access to the persistent reading store
///
/// Readings are append-only; implementations never expose update or delete.
#[async_trait]
pub trait ReadingStore: DomainPort {
    /// Appends exactly one reading
    async fn append(&self, reading: &Reading) -> Result<(), PortError>;

    /// Returns all readings for the meter whose `recorded_at` lies in the
    /// inclusive `[start, end]` instant range, ordered ascending by
    /// `recorded_at`
    async fn find_in_window(
        &self,
        serial: &MeterSerial,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, PortError>;
}

/// In-memory mock adapters for testing without a database
pub mod mock {
    use super::*;
    use crate::meter::MeterStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory mock implementation of [`MeterRegistry`]
    #[derive(Debug, Default)]
    pub struct MockMeterRegistry {
        meters: Mutex<HashMap<String, MeterStatus>>,
        fail_lookups: Mutex<bool>,
    }

    impl MockMeterRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a meter with the given status
        pub fn register(&self, serial: impl Into<MeterSerial>, status: MeterStatus) {
            let serial = serial.into();
            self.meters
                .lock()
                .unwrap()
                .insert(serial.as_str().to_string(), status);
        }

        /// Makes subsequent lookups fail with a connection error
        pub fn set_failing(&self, failing: bool) {
            *self.fail_lookups.lock().unwrap() = failing;
        }
    }

    impl DomainPort for MockMeterRegistry {}

    #[async_trait]
    impl MeterRegistry for MockMeterRegistry {
        async fn lookup(&self, serial: &MeterSerial) -> Result<MeterLookup, PortError> {
            if *self.fail_lookups.lock().unwrap() {
                return Err(PortError::connection("mock registry unavailable"));
            }
            let meters = self.meters.lock().unwrap();
            Ok(match meters.get(serial.as_str()) {
                Some(status) => MeterLookup::from(*status),
                None => MeterLookup::NotFound,
            })
        }
    }

    /// In-memory mock implementation of [`ReadingStore`]
    #[derive(Debug, Default)]
    pub struct InMemoryReadingStore {
        readings: Mutex<Vec<Reading>>,
        fail_appends: Mutex<bool>,
        fail_reads: Mutex<bool>,
    }

    impl InMemoryReadingStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent appends fail with a connection error
        pub fn set_failing(&self, failing: bool) {
            *self.fail_appends.lock().unwrap() = failing;
        }

        /// Makes subsequent range queries fail with a connection error
        pub fn set_failing_reads(&self, failing: bool) {
            *self.fail_reads.lock().unwrap() = failing;
        }

        /// Number of stored readings, for asserting side effects
        pub fn len(&self) -> usize {
            self.readings.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl DomainPort for InMemoryReadingStore {}

    #[async_trait]
    impl ReadingStore for InMemoryReadingStore {
        async fn append(&self, reading: &Reading) -> Result<(), PortError> {
            if *self.fail_appends.lock().unwrap() {
                return Err(PortError::connection("mock reading store unavailable"));
            }
            self.readings.lock().unwrap().push(reading.clone());
            Ok(())
        }

        async fn find_in_window(
            &self,
            serial: &MeterSerial,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Reading>, PortError> {
            if *self.fail_reads.lock().unwrap() {
                return Err(PortError::connection("mock reading store unavailable"));
            }
            let mut matched: Vec<Reading> = self
                .readings
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.meter_serial == *serial && r.recorded_at >= start && r.recorded_at <= end
                })
                .cloned()
                .collect();
            matched.sort_by_key(|r| r.recorded_at);
            Ok(matched)
        }
    }
}
