//! Reading repository implementation
//!
//! Append-only storage for telemetry readings plus the windowed range scan
//! the aggregation paths run on.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for meter readings
#[derive(Debug, Clone)]
pub struct ReadingRepository {
    pool: PgPool,
}

impl ReadingRepository {
    /// Creates a new ReadingRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one reading
    pub async fn insert(&self, reading: NewReading) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO readings (
                reading_id, meter_serial, recorded_at, energy_kwh,
                voltage, current, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reading.reading_id)
        .bind(&reading.meter_serial)
        .bind(reading.recorded_at)
        .bind(reading.energy_kwh)
        .bind(reading.voltage)
        .bind(reading.current)
        .bind(reading.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }

    /// Fetches readings for a meter inside an inclusive instant range,
    /// ascending by recording time
    pub async fn find_in_range(
        &self,
        meter_serial: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ReadingRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReadingRow>(
            r#"
            SELECT reading_id, meter_serial, recorded_at, energy_kwh,
                   voltage, current, created_at
            FROM readings
            WHERE meter_serial = $1
              AND recorded_at >= $2
              AND recorded_at <= $3
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(meter_serial)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }
}

/// Database row for a reading
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReadingRow {
    pub reading_id: Uuid,
    pub meter_serial: String,
    pub recorded_at: DateTime<Utc>,
    pub energy_kwh: Decimal,
    pub voltage: Decimal,
    pub current: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Data for appending a new reading
#[derive(Debug, Clone)]
pub struct NewReading {
    pub reading_id: Uuid,
    pub meter_serial: String,
    pub recorded_at: DateTime<Utc>,
    pub energy_kwh: Decimal,
    pub voltage: Decimal,
    pub current: Decimal,
    pub created_at: DateTime<Utc>,
}
