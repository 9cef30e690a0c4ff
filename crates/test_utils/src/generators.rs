//! Property-Based Test Generators
//!
//! Proptest strategies generating random test data that maintains domain
//! invariants.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{ConsumptionWindow, Currency, Money};
use domain_metering::MeterSerial;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::SGD),
    ]
}

/// Strategy for generating non-negative consumption values in kWh
pub fn energy_kwh_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64, 0u32..4u32).prop_map(|(m, s)| Decimal::new(m, s))
}

/// Strategy for generating positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64, currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating meter serial numbers
pub fn meter_serial_strategy() -> impl Strategy<Value = MeterSerial> {
    (1u32..100_000u32).prop_map(|n| MeterSerial::new(format!("MTR-{n:05}")))
}

/// Strategy for generating dates within 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(days)
    })
}

/// Strategy for generating valid consumption windows within 2024
pub fn window_strategy() -> impl Strategy<Value = ConsumptionWindow> {
    (0i64..300i64, 0i64..64i64).prop_map(|(start_days, span_days)| {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(start_days);
        let to = from + Duration::days(span_days);
        ConsumptionWindow::new(from, to).expect("generated window must be ordered")
    })
}

/// Strategy for generating instants within 2024
pub fn instant_2024_strategy() -> impl Strategy<Value = chrono::DateTime<Utc>> {
    (0i64..365i64, 0u32..24u32).prop_map(|(days, hour)| {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap() + Duration::days(days)
    })
}
