//! PostgreSQL reading store adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError, ReadingId};
use domain_metering::{MeterSerial, Reading, ReadingStore};

use super::db_to_port_error;
use crate::repositories::reading::{NewReading, ReadingRepository, ReadingRow};

/// PostgreSQL-backed implementation of the [`ReadingStore`] port
#[derive(Debug, Clone)]
pub struct PostgresReadingStore {
    repository: ReadingRepository,
}

impl PostgresReadingStore {
    /// Creates a new PostgreSQL reading store adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReadingRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresReadingStore {}

#[async_trait]
impl ReadingStore for PostgresReadingStore {
    #[instrument(skip(self, reading), fields(meter = %reading.meter_serial))]
    async fn append(&self, reading: &Reading) -> Result<(), PortError> {
        debug!("appending reading");

        self.repository
            .insert(NewReading {
                reading_id: *reading.id.as_uuid(),
                meter_serial: reading.meter_serial.as_str().to_string(),
                recorded_at: reading.recorded_at,
                energy_kwh: reading.energy_kwh,
                voltage: reading.voltage,
                current: reading.current,
                created_at: reading.created_at,
            })
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(meter = %serial))]
    async fn find_in_window(
        &self,
        serial: &MeterSerial,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, PortError> {
        let rows = self
            .repository
            .find_in_range(serial.as_str(), start, end)
            .await
            .map_err(db_to_port_error)?;

        Ok(rows.into_iter().map(row_to_reading).collect())
    }
}

fn row_to_reading(row: ReadingRow) -> Reading {
    Reading {
        id: ReadingId::from_uuid(row.reading_id),
        meter_serial: MeterSerial::new(row.meter_serial),
        recorded_at: row.recorded_at,
        energy_kwh: row.energy_kwh,
        voltage: row.voltage,
        current: row.current,
        created_at: row.created_at,
    }
}
