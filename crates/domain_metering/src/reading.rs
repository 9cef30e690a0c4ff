//! Reading model
//!
//! A reading is one timestamped measurement of energy consumed by a meter.
//! Readings are append-only: once stored they are never updated or deleted
//! by this core.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::ReadingId;

use crate::meter::MeterSerial;

/// A single persisted consumption reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Unique identifier
    pub id: ReadingId,
    /// Owning meter serial number
    pub meter_serial: MeterSerial,
    /// When the measurement was taken (UTC)
    pub recorded_at: DateTime<Utc>,
    /// Energy consumed in kWh, non-negative
    pub energy_kwh: Decimal,
    /// Auxiliary voltage measurement, zero when unset
    pub voltage: Decimal,
    /// Auxiliary current measurement, zero when unset
    pub current: Decimal,
    /// When the reading was persisted
    pub created_at: DateTime<Utc>,
}

impl Reading {
    /// Creates a new reading with voltage/current defaulted to zero
    pub fn new(meter_serial: MeterSerial, recorded_at: DateTime<Utc>, energy_kwh: Decimal) -> Self {
        Self {
            id: ReadingId::new_v7(),
            meter_serial,
            recorded_at,
            energy_kwh,
            voltage: Decimal::ZERO,
            current: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Sets the auxiliary electrical measurements
    pub fn with_electricals(mut self, voltage: Decimal, current: Decimal) -> Self {
        self.voltage = voltage;
        self.current = current;
        self
    }
}

/// One (timestamp, value) pair in a consumption listing
///
/// Each entry is the raw reading value for its own timestamp; no cumulative
/// column is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingEntry {
    pub recorded_at: DateTime<Utc>,
    pub energy_kwh: Decimal,
}

impl From<&Reading> for ReadingEntry {
    fn from(reading: &Reading) -> Self {
        Self {
            recorded_at: reading.recorded_at,
            energy_kwh: reading.energy_kwh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reading_defaults_electricals_to_zero() {
        let reading = Reading::new(MeterSerial::new("MTR-001"), Utc::now(), dec!(12.5));

        assert_eq!(reading.voltage, Decimal::ZERO);
        assert_eq!(reading.current, Decimal::ZERO);
        assert_eq!(reading.energy_kwh, dec!(12.5));
    }

    #[test]
    fn test_reading_with_electricals() {
        let reading = Reading::new(MeterSerial::new("MTR-001"), Utc::now(), dec!(1))
            .with_electricals(dec!(230.1), dec!(4.2));

        assert_eq!(reading.voltage, dec!(230.1));
        assert_eq!(reading.current, dec!(4.2));
    }

    #[test]
    fn test_entry_from_reading() {
        let reading = Reading::new(MeterSerial::new("MTR-001"), Utc::now(), dec!(7));
        let entry = ReadingEntry::from(&reading);

        assert_eq!(entry.recorded_at, reading.recorded_at);
        assert_eq!(entry.energy_kwh, dec!(7));
    }
}
