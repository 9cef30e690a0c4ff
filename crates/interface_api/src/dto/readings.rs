//! Reading and consumption DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_metering::ReadingEntry;

/// Request body for submitting one reading
///
/// `recorded_at` stays a string end to end; timestamp parsing belongs to
/// the ingestion path so a malformed value surfaces as its distinct error.
/// All malformed input on this surface answers 400, whether a field
/// validation or a timestamp parse failure; the body's error type tells
/// them apart.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordReadingRequest {
    #[validate(length(min = 1, message = "meter_serial must not be empty"))]
    pub meter_serial: String,
    #[validate(length(min = 1, message = "recorded_at must not be empty"))]
    pub recorded_at: String,
    pub energy_kwh: Decimal,
}

/// Outcome of a reading submission
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordReadingResponse {
    pub recorded: bool,
}

/// Query parameters selecting an inclusive date window
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Summed consumption for a meter over a window
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumptionResponse {
    pub meter_serial: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_kwh: Decimal,
}

/// One reading in a listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadingEntryDto {
    pub recorded_at: DateTime<Utc>,
    pub energy_kwh: Decimal,
}

impl From<ReadingEntry> for ReadingEntryDto {
    fn from(entry: ReadingEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at,
            energy_kwh: entry.energy_kwh,
        }
    }
}

/// Per-reading listing for a meter over a window
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadingsResponse {
    pub meter_serial: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub readings: Vec<ReadingEntryDto>,
}
