//! Test Fixtures
//!
//! Pre-built values for the entities most tests need. Fixtures are plain
//! functions grouped in namespace structs so call sites read as
//! `WindowFixtures::january_2024()`.

use chrono::{DateTime, NaiveDate, Utc};
use fake::faker::address::en::CityName;
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{ConsumerId, ConsumptionWindow, Currency, Money};
use domain_metering::{CallerId, MeterSerial};

/// Common consumption windows
pub struct WindowFixtures;

impl WindowFixtures {
    /// The whole of January 2024
    pub fn january_2024() -> ConsumptionWindow {
        ConsumptionWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    /// A one-day window
    pub fn single_day(year: i32, month: u32, day: u32) -> ConsumptionWindow {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        ConsumptionWindow::new(date, date).unwrap()
    }

    /// A window guaranteed to hold no fixture readings
    pub fn empty_2023() -> ConsumptionWindow {
        ConsumptionWindow::new(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        )
        .unwrap()
    }
}

/// Common meter identities
pub struct MeterFixtures;

impl MeterFixtures {
    pub fn active_serial() -> MeterSerial {
        MeterSerial::new("MTR-001")
    }

    pub fn inactive_serial() -> MeterSerial {
        MeterSerial::new("MTR-999")
    }

    pub fn unknown_serial() -> MeterSerial {
        MeterSerial::new("MTR-404")
    }

    /// A random installation location
    pub fn location() -> String {
        CityName().fake()
    }
}

/// Common caller and consumer identities
pub struct IdentityFixtures;

impl IdentityFixtures {
    pub fn caller() -> CallerId {
        CallerId::new("test-caller")
    }

    pub fn consumer() -> ConsumerId {
        ConsumerId::new()
    }
}

/// Common monetary values
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The standard test tariff rate per kWh
    pub fn usd_unit_price() -> Money {
        Money::new(dec!(0.15), Currency::USD)
    }

    pub fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }
}

/// Common timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A mid-window instant on the given January 2024 day
    pub fn january_instant(day: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_january_window_spans_the_month() {
        let window = WindowFixtures::january_2024();
        assert_eq!(window.days(), 31);
    }

    #[test]
    fn test_fixture_instants_fall_inside_january() {
        let window = WindowFixtures::january_2024();
        assert!(window.contains(TemporalFixtures::january_instant(1)));
        assert!(window.contains(TemporalFixtures::january_instant(31)));
    }
}
