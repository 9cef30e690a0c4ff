//! Reading ingestion and consumption handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use validator::Validate;

use core_kernel::ConsumptionWindow;
use domain_metering::{CallerId, MeterSerial};

use crate::dto::readings::{
    ConsumptionResponse, ReadingsResponse, RecordReadingRequest, RecordReadingResponse,
    WindowQuery,
};
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/v1/readings`
///
/// Submits one reading. Business rejections (unknown or inactive meter,
/// negative consumption, store failure) come back as `recorded: false`
/// with a 200; only malformed input is an error status.
pub async fn record_reading(
    State(state): State<AppState>,
    Json(request): Json<RecordReadingRequest>,
) -> Result<Json<RecordReadingResponse>, ApiError> {
    request.validate()?;

    let serial = MeterSerial::new(&request.meter_serial);
    let recorded = state
        .ingestor
        .record_reading(&serial, &request.recorded_at, request.energy_kwh)
        .await?;

    Ok(Json(RecordReadingResponse { recorded }))
}

/// `GET /api/v1/meters/:serial/consumption?from=&to=`
pub async fn get_consumption(
    State(state): State<AppState>,
    Path(serial): Path<String>,
    Query(query): Query<WindowQuery>,
    Extension(caller): Extension<CallerId>,
) -> Result<Json<ConsumptionResponse>, ApiError> {
    let serial = MeterSerial::new(serial);
    let window = parse_window(&query)?;

    let total_kwh = state
        .aggregator
        .total_consumption(&serial, window, &caller)
        .await?;

    Ok(Json(ConsumptionResponse {
        meter_serial: serial.as_str().to_string(),
        from: window.from,
        to: window.to,
        total_kwh,
    }))
}

/// `GET /api/v1/meters/:serial/readings?from=&to=`
pub async fn list_readings(
    State(state): State<AppState>,
    Path(serial): Path<String>,
    Query(query): Query<WindowQuery>,
    Extension(caller): Extension<CallerId>,
) -> Result<Json<ReadingsResponse>, ApiError> {
    let serial = MeterSerial::new(serial);
    let window = parse_window(&query)?;

    let entries = state
        .aggregator
        .list_readings(&serial, window, &caller)
        .await?;

    Ok(Json(ReadingsResponse {
        meter_serial: serial.as_str().to_string(),
        from: window.from,
        to: window.to,
        readings: entries.into_iter().map(Into::into).collect(),
    }))
}

fn parse_window(query: &WindowQuery) -> Result<ConsumptionWindow, ApiError> {
    ConsumptionWindow::new(query.from, query.to).map_err(|e| ApiError::BadRequest(e.to_string()))
}
