//! Consumption aggregation
//!
//! Read operations over stored readings: per-reading listings and summed
//! totals for an inclusive date window. Both operations require a prior
//! successful access check and raise an authorization failure, distinct
//! from "no data", when the check fails. Store errors on these read paths
//! propagate to the caller.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use core_kernel::ConsumptionWindow;

use crate::access::{AccessPolicy, CallerId};
use crate::error::MeteringError;
use crate::meter::MeterSerial;
use crate::ports::ReadingStore;
use crate::reading::ReadingEntry;

/// Service computing windowed consumption listings and totals
pub struct ConsumptionAggregator {
    access: Arc<dyn AccessPolicy>,
    readings: Arc<dyn ReadingStore>,
}

impl ConsumptionAggregator {
    pub fn new(access: Arc<dyn AccessPolicy>, readings: Arc<dyn ReadingStore>) -> Self {
        Self { access, readings }
    }

    /// Lists every reading in the inclusive window, ascending by timestamp.
    ///
    /// An empty window yields an empty sequence, not an error.
    pub async fn list_readings(
        &self,
        serial: &MeterSerial,
        window: ConsumptionWindow,
        caller: &CallerId,
    ) -> Result<Vec<ReadingEntry>, MeteringError> {
        self.check_access(serial, caller).await?;

        let (start, end) = window.bounds();
        let mut readings = self.readings.find_in_window(serial, start, end).await?;
        // Store contract says ascending, but the window boundary is ours to own
        readings.sort_by_key(|r| r.recorded_at);

        debug!(meter = %serial, %window, count = readings.len(), "listed readings");
        Ok(readings.iter().map(ReadingEntry::from).collect())
    }

    /// Sums `energy_kwh` over the inclusive window.
    ///
    /// Returns exactly zero (not an error) when no readings match.
    pub async fn total_consumption(
        &self,
        serial: &MeterSerial,
        window: ConsumptionWindow,
        caller: &CallerId,
    ) -> Result<Decimal, MeteringError> {
        self.check_access(serial, caller).await?;

        let (start, end) = window.bounds();
        let readings = self.readings.find_in_window(serial, start, end).await?;
        Ok(readings.iter().map(|r| r.energy_kwh).sum())
    }

    async fn check_access(
        &self,
        serial: &MeterSerial,
        caller: &CallerId,
    ) -> Result<(), MeteringError> {
        if self.access.evaluate(serial, caller).await.is_granted() {
            Ok(())
        } else {
            Err(MeteringError::access_denied(serial, caller))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ActiveMeterPolicy;
    use crate::meter::MeterStatus;
    use crate::ports::mock::{InMemoryReadingStore, MockMeterRegistry};
    use crate::ports::ReadingStore as _;
    use crate::reading::Reading;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn window(from: (i32, u32, u32), to: (i32, u32, u32)) -> ConsumptionWindow {
        ConsumptionWindow::new(
            NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
        )
        .unwrap()
    }

    async fn seeded_aggregator() -> ConsumptionAggregator {
        let registry = Arc::new(MockMeterRegistry::new());
        registry.register("MTR-001", MeterStatus::Active);
        registry.register("MTR-002", MeterStatus::Inactive);

        let store = Arc::new(InMemoryReadingStore::new());
        for (day, kwh) in [(15, dec!(15)), (1, dec!(10))] {
            let ts = NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                .and_utc();
            store
                .append(&Reading::new(MeterSerial::new("MTR-001"), ts, kwh))
                .await
                .unwrap();
        }

        let policy = Arc::new(ActiveMeterPolicy::new(registry));
        ConsumptionAggregator::new(policy, store)
    }

    #[tokio::test]
    async fn total_sums_inclusive_window() {
        let aggregator = seeded_aggregator().await;

        let total = aggregator
            .total_consumption(
                &MeterSerial::new("MTR-001"),
                window((2024, 1, 1), (2024, 1, 31)),
                &CallerId::new("caller-7"),
            )
            .await
            .unwrap();

        assert_eq!(total, dec!(25));
    }

    #[tokio::test]
    async fn listing_is_ascending_and_sums_to_total() {
        let aggregator = seeded_aggregator().await;
        let serial = MeterSerial::new("MTR-001");
        let caller = CallerId::new("caller-7");
        let w = window((2024, 1, 1), (2024, 1, 31));

        let entries = aggregator.list_readings(&serial, w, &caller).await.unwrap();
        let total = aggregator.total_consumption(&serial, w, &caller).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].recorded_at < entries[1].recorded_at);
        assert_eq!(entries.iter().map(|e| e.energy_kwh).sum::<Decimal>(), total);
    }

    #[tokio::test]
    async fn empty_window_yields_zero_and_empty() {
        let aggregator = seeded_aggregator().await;
        let serial = MeterSerial::new("MTR-001");
        let caller = CallerId::new("caller-7");
        let w = window((2023, 1, 1), (2023, 12, 31));

        assert_eq!(
            aggregator.total_consumption(&serial, w, &caller).await.unwrap(),
            Decimal::ZERO
        );
        assert!(aggregator.list_readings(&serial, w, &caller).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_propagates_on_both_read_paths() {
        let registry = Arc::new(MockMeterRegistry::new());
        registry.register("MTR-001", MeterStatus::Active);
        let store = Arc::new(InMemoryReadingStore::new());
        store.set_failing_reads(true);
        let policy = Arc::new(ActiveMeterPolicy::new(registry));
        let aggregator = ConsumptionAggregator::new(policy, store);

        let serial = MeterSerial::new("MTR-001");
        let caller = CallerId::new("caller-7");
        let w = window((2024, 1, 1), (2024, 1, 31));

        let list = aggregator.list_readings(&serial, w, &caller).await;
        let total = aggregator.total_consumption(&serial, w, &caller).await;

        assert!(matches!(list, Err(MeteringError::Store(_))));
        assert!(matches!(total, Err(MeteringError::Store(_))));
    }

    #[tokio::test]
    async fn denied_caller_gets_access_denied_not_empty() {
        let aggregator = seeded_aggregator().await;
        let serial = MeterSerial::new("MTR-002");
        let caller = CallerId::new("caller-7");
        let w = window((2024, 1, 1), (2024, 1, 31));

        let list = aggregator.list_readings(&serial, w, &caller).await;
        let total = aggregator.total_consumption(&serial, w, &caller).await;

        assert!(matches!(list, Err(ref e) if e.is_access_denied()));
        assert!(matches!(total, Err(ref e) if e.is_access_denied()));
    }
}
