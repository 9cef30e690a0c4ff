//! Meter repository implementation
//!
//! Database access for the meter registry: provisioning and serial lookup.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DatabaseError;

/// Repository for provisioned meters
#[derive(Debug, Clone)]
pub struct MeterRepository {
    pool: PgPool,
}

impl MeterRepository {
    /// Creates a new MeterRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a newly provisioned meter
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` if the serial already exists
    pub async fn insert(&self, meter: NewMeter) -> Result<MeterRow, DatabaseError> {
        let row = sqlx::query_as::<_, MeterRow>(
            r#"
            INSERT INTO meters (serial, status, location, installed_at)
            VALUES ($1, $2, $3, $4)
            RETURNING serial, status, location, installed_at
            "#,
        )
        .bind(&meter.serial)
        .bind(&meter.status)
        .bind(&meter.location)
        .bind(meter.installed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }

    /// Looks up a meter by serial number
    pub async fn find_by_serial(&self, serial: &str) -> Result<Option<MeterRow>, DatabaseError> {
        let row = sqlx::query_as::<_, MeterRow>(
            r#"
            SELECT serial, status, location, installed_at
            FROM meters
            WHERE serial = $1
            "#,
        )
        .bind(serial)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }

    /// Updates a meter's lifecycle status
    ///
    /// Returns the number of affected rows (0 when the serial is unknown)
    pub async fn update_status(&self, serial: &str, status: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE meters SET status = $2 WHERE serial = $1
            "#,
        )
        .bind(serial)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(result.rows_affected())
    }
}

/// Database row for a meter
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeterRow {
    pub serial: String,
    pub status: String,
    pub location: Option<String>,
    pub installed_at: DateTime<Utc>,
}

/// Data for provisioning a new meter
#[derive(Debug, Clone)]
pub struct NewMeter {
    pub serial: String,
    pub status: String,
    pub location: Option<String>,
    pub installed_at: DateTime<Utc>,
}
