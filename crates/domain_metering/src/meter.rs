//! Meter model
//!
//! Meters are provisioned and maintained by an external process; this core
//! only reads them. The registry lookup keeps "not found" and "inactive"
//! as distinct variants internally and collapses them at the public boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A meter serial number
///
/// Serial numbers are externally assigned, unique, opaque strings
/// (e.g. "MTR-001"). Stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeterSerial(String);

impl MeterSerial {
    pub fn new(serial: impl Into<String>) -> Self {
        Self(serial.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeterSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MeterSerial {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Provisioning status of a meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterStatus {
    /// Meter is installed and producing accepted readings
    Active,
    /// Meter is provisioned but not currently accepting readings
    Inactive,
    /// Meter has been permanently retired
    Decommissioned,
}

impl MeterStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, MeterStatus::Active)
    }
}

/// A physical energy meter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meter {
    /// Externally assigned serial number
    pub serial: MeterSerial,
    /// Provisioning status
    pub status: MeterStatus,
    /// Free-text installation location
    pub location: Option<String>,
    /// When the meter was installed
    pub installed_at: DateTime<Utc>,
}

impl Meter {
    pub fn new(serial: MeterSerial, status: MeterStatus) -> Self {
        Self {
            serial,
            status,
            location: None,
            installed_at: Utc::now(),
        }
    }

    /// Sets the installation location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Result of resolving a serial number against the meter registry
///
/// Inactive and NotFound stay distinct here so the logic is testable at
/// fine grain; callers that only care about usability collapse them with
/// `is_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterLookup {
    /// Meter exists and is active
    Active,
    /// Meter exists but is not active
    Inactive,
    /// No meter with this serial is known
    NotFound,
}

impl MeterLookup {
    /// Collapses the lookup to the public accept/reject boundary
    pub fn is_active(&self) -> bool {
        matches!(self, MeterLookup::Active)
    }
}

impl From<MeterStatus> for MeterLookup {
    fn from(status: MeterStatus) -> Self {
        if status.is_active() {
            MeterLookup::Active
        } else {
            MeterLookup::Inactive
        }
    }
}
