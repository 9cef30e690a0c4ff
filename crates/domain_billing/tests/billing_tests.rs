//! Integration tests for the bill lifecycle
//!
//! Exercises generation, reads, and the pay transition end to end against
//! in-memory adapters, including the concurrent-payment race.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{ConsumerId, ConsumptionWindow, Currency, Money};
use domain_billing::ports::mock::InMemoryBillStore;
use domain_billing::{BillingEngine, BillingError, FlatRateTariff, PaymentMethod};
use domain_metering::ports::mock::{InMemoryReadingStore, MockMeterRegistry};
use domain_metering::{
    ActiveMeterPolicy, ConsumptionAggregator, MeterSerial, MeterStatus, Reading, ReadingStore as _,
};

struct World {
    engine: Arc<BillingEngine>,
    bills: Arc<InMemoryBillStore>,
    consumer: ConsumerId,
}

impl World {
    async fn new() -> Self {
        let registry = Arc::new(MockMeterRegistry::new());
        registry.register("MTR-001", MeterStatus::Active);
        registry.register("MTR-999", MeterStatus::Inactive);

        let readings = Arc::new(InMemoryReadingStore::new());
        for (day, kwh) in [(5, dec!(10)), (20, dec!(15))] {
            let ts = NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc();
            readings
                .append(&Reading::new(MeterSerial::new("MTR-001"), ts, kwh))
                .await
                .unwrap();
        }

        let aggregator = Arc::new(ConsumptionAggregator::new(
            Arc::new(ActiveMeterPolicy::new(registry)),
            readings,
        ));
        let tariff = Arc::new(FlatRateTariff::new(Money::new(dec!(0.15), Currency::USD)));
        let bills = Arc::new(InMemoryBillStore::new());
        let engine = Arc::new(BillingEngine::new(aggregator, tariff, bills.clone()));

        Self {
            engine,
            bills,
            consumer: ConsumerId::new(),
        }
    }
}

fn january() -> ConsumptionWindow {
    ConsumptionWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    )
    .unwrap()
}

mod generation_tests {
    use super::*;

    #[tokio::test]
    async fn generate_prices_window_total_and_starts_pending() {
        let world = World::new().await;

        let bill = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-001"), january())
            .await
            .unwrap();

        assert_eq!(bill.total_kwh, dec!(25));
        assert_eq!(bill.amount_due.amount(), dec!(3.75));
        assert!(bill.is_pending());

        let stored = world.engine.get_bill_by_id(bill.id).await.unwrap().unwrap();
        assert!(stored.is_pending());
    }

    #[tokio::test]
    async fn empty_window_bills_zero() {
        let world = World::new().await;
        let window = ConsumptionWindow::new(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        )
        .unwrap();

        let bill = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-001"), window)
            .await
            .unwrap();

        assert!(bill.total_kwh.is_zero());
        assert!(bill.amount_due.is_zero());
        assert!(bill.is_pending());
    }

    #[tokio::test]
    async fn inactive_meter_denies_generation() {
        let world = World::new().await;

        let result = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-999"), january())
            .await;

        assert!(
            matches!(result, Err(BillingError::Metering(ref e)) if e.is_access_denied()),
            "expected access denial, got {result:?}"
        );
    }

    #[tokio::test]
    async fn repeated_generation_creates_distinct_bills() {
        let world = World::new().await;
        let serial = MeterSerial::new("MTR-001");

        let first = world
            .engine
            .generate_bill(world.consumer, &serial, january())
            .await
            .unwrap();
        let second = world
            .engine
            .generate_bill(world.consumer, &serial, january())
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            world.engine.get_consumer_bills(world.consumer).await.unwrap().len(),
            2
        );
    }
}

mod payment_tests {
    use super::*;

    #[tokio::test]
    async fn pay_settles_for_full_amount() {
        let world = World::new().await;
        let bill = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-001"), january())
            .await
            .unwrap();

        let payment = world
            .engine
            .pay_bill(bill.id, PaymentMethod::Card)
            .await
            .unwrap();

        assert_eq!(payment.bill_id, bill.id);
        assert_eq!(payment.amount, bill.amount_due);

        let settled = world.engine.get_bill_by_id(bill.id).await.unwrap().unwrap();
        assert!(settled.is_paid());

        let payments = world.engine.get_bill_payments(bill.id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, payment.id);
    }

    #[tokio::test]
    async fn second_payment_is_rejected() {
        let world = World::new().await;
        let bill = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-001"), january())
            .await
            .unwrap();

        world.engine.pay_bill(bill.id, PaymentMethod::Cash).await.unwrap();
        let second = world.engine.pay_bill(bill.id, PaymentMethod::Cash).await;

        assert!(matches!(second, Err(BillingError::AlreadyPaid(_))));
        assert_eq!(world.bills.payment_count(), 1);
    }

    #[tokio::test]
    async fn unknown_bill_is_not_found() {
        let world = World::new().await;

        let result = world
            .engine
            .pay_bill(core_kernel::BillId::new_v7(), PaymentMethod::Cash)
            .await;

        assert!(matches!(result, Err(BillingError::BillNotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_payments_admit_exactly_one_success() {
        let world = World::new().await;
        let bill = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-001"), january())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = world.engine.clone();
            let id = bill.id;
            handles.push(tokio::spawn(async move {
                engine.pay_bill(id, PaymentMethod::Card).await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(BillingError::AlreadyPaid(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(world.bills.payment_count(), 1);
    }
}

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn pending_filter_excludes_paid_bills() {
        let world = World::new().await;
        let serial = MeterSerial::new("MTR-001");

        let first = world
            .engine
            .generate_bill(world.consumer, &serial, january())
            .await
            .unwrap();
        let second = world
            .engine
            .generate_bill(world.consumer, &serial, january())
            .await
            .unwrap();

        world.engine.pay_bill(first.id, PaymentMethod::Cash).await.unwrap();

        let pending = world.engine.get_pending_bills().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
    }

    #[tokio::test]
    async fn consumer_bills_do_not_leak_across_consumers() {
        let world = World::new().await;
        let other = ConsumerId::new();
        let serial = MeterSerial::new("MTR-001");

        world
            .engine
            .generate_bill(world.consumer, &serial, january())
            .await
            .unwrap();
        world
            .engine
            .generate_bill(other, &serial, january())
            .await
            .unwrap();

        let mine = world.engine.get_consumer_bills(world.consumer).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].consumer_id, world.consumer);
    }

    #[tokio::test]
    async fn payments_for_unpaid_bill_are_empty() {
        let world = World::new().await;
        let bill = world
            .engine
            .generate_bill(world.consumer, &MeterSerial::new("MTR-001"), january())
            .await
            .unwrap();

        assert!(world.engine.get_bill_payments(bill.id).await.unwrap().is_empty());
    }
}
