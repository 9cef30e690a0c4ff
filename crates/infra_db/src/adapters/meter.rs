//! PostgreSQL meter registry adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError};
use domain_metering::{MeterLookup, MeterRegistry, MeterSerial, MeterStatus};

use super::db_to_port_error;
use crate::repositories::meter::MeterRepository;

/// PostgreSQL-backed implementation of the [`MeterRegistry`] port
#[derive(Debug, Clone)]
pub struct PostgresMeterRegistry {
    repository: MeterRepository,
}

impl PostgresMeterRegistry {
    /// Creates a new PostgreSQL meter registry adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MeterRepository::new(pool),
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &MeterRepository {
        &self.repository
    }
}

impl DomainPort for PostgresMeterRegistry {}

#[async_trait]
impl MeterRegistry for PostgresMeterRegistry {
    #[instrument(skip(self), fields(meter = %serial))]
    async fn lookup(&self, serial: &MeterSerial) -> Result<MeterLookup, PortError> {
        debug!("looking up meter");

        let row = self
            .repository
            .find_by_serial(serial.as_str())
            .await
            .map_err(db_to_port_error)?;

        Ok(match row {
            None => MeterLookup::NotFound,
            Some(row) => MeterLookup::from(status_from_db(&row.status)?),
        })
    }
}

fn status_from_db(status: &str) -> Result<MeterStatus, PortError> {
    match status {
        "active" => Ok(MeterStatus::Active),
        "inactive" => Ok(MeterStatus::Inactive),
        "decommissioned" => Ok(MeterStatus::Decommissioned),
        other => Err(PortError::internal(format!(
            "unknown meter status '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_db() {
        assert_eq!(status_from_db("active").unwrap(), MeterStatus::Active);
        assert_eq!(status_from_db("inactive").unwrap(), MeterStatus::Inactive);
        assert_eq!(
            status_from_db("decommissioned").unwrap(),
            MeterStatus::Decommissioned
        );
        assert!(status_from_db("retired").is_err());
    }
}
