//! Reading ingestion
//!
//! Validates and persists a single consumption reading for a meter.
//! Ingestion is deliberately best-effort: business-rule rejections and store
//! failures report failure-to-record (`Ok(false)`) instead of raising, and
//! the underlying cause is logged for diagnostics. The only raised condition
//! is malformed timestamp text, which is a parse error rather than a
//! business rejection.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use core_kernel::parse_reading_timestamp;

use crate::error::MeteringError;
use crate::meter::MeterSerial;
use crate::ports::{MeterRegistry, ReadingStore};
use crate::reading::Reading;

/// Service that validates and persists meter readings
pub struct ReadingIngestor {
    registry: Arc<dyn MeterRegistry>,
    readings: Arc<dyn ReadingStore>,
}

impl ReadingIngestor {
    pub fn new(registry: Arc<dyn MeterRegistry>, readings: Arc<dyn ReadingStore>) -> Self {
        Self { registry, readings }
    }

    /// Records one reading for the meter.
    ///
    /// Returns `Ok(true)` when exactly one reading was appended, `Ok(false)`
    /// when the reading was rejected (negative consumption, unknown or
    /// inactive meter) or the store failed, and `Err(InvalidTimestamp)` only
    /// when `recorded_at_text` cannot be parsed.
    ///
    /// Not idempotent: identical submissions create duplicate readings.
    /// There is no deduplication key; transport-level retries can
    /// double-count consumption and duplicate suppression is a caller
    /// concern.
    pub async fn record_reading(
        &self,
        serial: &MeterSerial,
        recorded_at_text: &str,
        energy_kwh: Decimal,
    ) -> Result<bool, MeteringError> {
        let recorded_at = parse_reading_timestamp(recorded_at_text)?;

        if energy_kwh.is_sign_negative() {
            debug!(meter = %serial, %energy_kwh, "rejecting negative consumption");
            return Ok(false);
        }

        match self.registry.lookup(serial).await {
            Ok(lookup) if lookup.is_active() => {}
            Ok(lookup) => {
                debug!(meter = %serial, ?lookup, "rejecting reading for unavailable meter");
                return Ok(false);
            }
            Err(error) => {
                warn!(meter = %serial, %error, "registry lookup failed during ingestion");
                return Ok(false);
            }
        }

        let reading = Reading::new(serial.clone(), recorded_at, energy_kwh);
        match self.readings.append(&reading).await {
            Ok(()) => Ok(true),
            Err(error) => {
                warn!(meter = %serial, %error, "failed to persist reading");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::MeterStatus;
    use crate::ports::mock::{InMemoryReadingStore, MockMeterRegistry};
    use rust_decimal_macros::dec;

    fn ingestor() -> (ReadingIngestor, Arc<InMemoryReadingStore>) {
        let registry = Arc::new(MockMeterRegistry::new());
        registry.register("MTR-001", MeterStatus::Active);
        registry.register("MTR-999", MeterStatus::Inactive);
        let store = Arc::new(InMemoryReadingStore::new());
        (
            ReadingIngestor::new(registry, store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn accepts_valid_reading() {
        let (ingestor, store) = ingestor();

        let recorded = ingestor
            .record_reading(&MeterSerial::new("MTR-001"), "2024-01-01T10:00:00Z", dec!(10))
            .await
            .unwrap();

        assert!(recorded);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn rejects_negative_consumption_without_persisting() {
        let (ingestor, store) = ingestor();

        let recorded = ingestor
            .record_reading(&MeterSerial::new("MTR-001"), "2024-01-01", dec!(-0.1))
            .await
            .unwrap();

        assert!(!recorded);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rejects_inactive_meter() {
        let (ingestor, store) = ingestor();

        let recorded = ingestor
            .record_reading(&MeterSerial::new("MTR-999"), "2024-01-01", dec!(5))
            .await
            .unwrap();

        assert!(!recorded);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn malformed_timestamp_is_a_distinct_error() {
        let (ingestor, store) = ingestor();

        let result = ingestor
            .record_reading(&MeterSerial::new("MTR-001"), "garbage", dec!(5))
            .await;

        assert!(matches!(result, Err(MeteringError::InvalidTimestamp(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_failure_reports_failure_to_record() {
        let (ingestor, store) = ingestor();
        store.set_failing(true);

        let recorded = ingestor
            .record_reading(&MeterSerial::new("MTR-001"), "2024-01-01T10:00:00Z", dec!(10))
            .await
            .unwrap();

        assert!(!recorded);
    }

    #[tokio::test]
    async fn zero_consumption_is_accepted() {
        let (ingestor, store) = ingestor();

        let recorded = ingestor
            .record_reading(&MeterSerial::new("MTR-001"), "2024-01-01", dec!(0))
            .await
            .unwrap();

        assert!(recorded);
        assert_eq!(store.len(), 1);
    }
}
