//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults, so
//! tests specify only the fields they care about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ConsumerId, ConsumptionWindow, Money};
use domain_billing::Bill;
use domain_metering::{MeterSerial, Reading};

use crate::fixtures::{MeterFixtures, MoneyFixtures, TemporalFixtures, WindowFixtures};

/// Builder for constructing test readings
pub struct ReadingBuilder {
    meter_serial: MeterSerial,
    recorded_at: DateTime<Utc>,
    energy_kwh: Decimal,
    electricals: Option<(Decimal, Decimal)>,
}

impl Default for ReadingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingBuilder {
    /// Creates a builder with default values: the active fixture meter,
    /// mid-January 2024, 10 kWh
    pub fn new() -> Self {
        Self {
            meter_serial: MeterFixtures::active_serial(),
            recorded_at: TemporalFixtures::january_instant(15),
            energy_kwh: dec!(10),
            electricals: None,
        }
    }

    pub fn with_meter(mut self, serial: MeterSerial) -> Self {
        self.meter_serial = serial;
        self
    }

    pub fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Places the reading on the given January 2024 day
    pub fn on_january_day(mut self, day: u32) -> Self {
        self.recorded_at = TemporalFixtures::january_instant(day);
        self
    }

    pub fn with_energy_kwh(mut self, energy_kwh: Decimal) -> Self {
        self.energy_kwh = energy_kwh;
        self
    }

    pub fn with_electricals(mut self, voltage: Decimal, current: Decimal) -> Self {
        self.electricals = Some((voltage, current));
        self
    }

    pub fn build(self) -> Reading {
        let reading = Reading::new(self.meter_serial, self.recorded_at, self.energy_kwh);
        match self.electricals {
            Some((voltage, current)) => reading.with_electricals(voltage, current),
            None => reading,
        }
    }
}

/// Builder for constructing test bills
pub struct BillBuilder {
    consumer_id: ConsumerId,
    meter_serial: MeterSerial,
    period: ConsumptionWindow,
    total_kwh: Decimal,
    amount_due: Money,
}

impl Default for BillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillBuilder {
    /// Creates a builder with default values: 25 kWh over January 2024 at
    /// the fixture tariff
    pub fn new() -> Self {
        Self {
            consumer_id: ConsumerId::new(),
            meter_serial: MeterFixtures::active_serial(),
            period: WindowFixtures::january_2024(),
            total_kwh: dec!(25),
            amount_due: MoneyFixtures::usd(dec!(3.75)),
        }
    }

    pub fn with_consumer(mut self, consumer_id: ConsumerId) -> Self {
        self.consumer_id = consumer_id;
        self
    }

    pub fn with_meter(mut self, serial: MeterSerial) -> Self {
        self.meter_serial = serial;
        self
    }

    pub fn with_period(mut self, period: ConsumptionWindow) -> Self {
        self.period = period;
        self
    }

    pub fn with_total_kwh(mut self, total_kwh: Decimal) -> Self {
        self.total_kwh = total_kwh;
        self
    }

    pub fn with_amount_due(mut self, amount_due: Money) -> Self {
        self.amount_due = amount_due;
        self
    }

    /// Builds a bill in its initial pending status
    pub fn build(self) -> Bill {
        Bill::new(
            self.consumer_id,
            self.meter_serial,
            self.period,
            self.total_kwh,
            self.amount_due,
        )
    }

    /// Builds a bill already transitioned to paid
    pub fn build_paid(self) -> Bill {
        let mut bill = self.build();
        bill.mark_paid().expect("fresh bill must be payable");
        bill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_builder_defaults() {
        let reading = ReadingBuilder::new().build();
        assert_eq!(reading.meter_serial, MeterFixtures::active_serial());
        assert_eq!(reading.energy_kwh, dec!(10));
        assert_eq!(reading.voltage, Decimal::ZERO);
    }

    #[test]
    fn test_reading_builder_electricals() {
        let reading = ReadingBuilder::new()
            .with_electricals(dec!(230), dec!(4.2))
            .build();
        assert_eq!(reading.voltage, dec!(230));
        assert_eq!(reading.current, dec!(4.2));
    }

    #[test]
    fn test_bill_builder_paid() {
        let bill = BillBuilder::new().build_paid();
        assert!(bill.is_paid());
    }
}
