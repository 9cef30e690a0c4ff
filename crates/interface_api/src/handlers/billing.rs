//! Billing handlers

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::{BillId, ConsumerId, ConsumptionWindow};
use domain_metering::MeterSerial;

use crate::dto::billing::{
    BillResponse, BillsQuery, GenerateBillRequest, PayBillRequest, PaymentResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/v1/bills`
pub async fn generate_bill(
    State(state): State<AppState>,
    Json(request): Json<GenerateBillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    request.validate()?;

    let period = ConsumptionWindow::new(request.from, request.to)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let consumer_id = ConsumerId::from_uuid(request.consumer_id);
    let serial = MeterSerial::new(&request.meter_serial);

    let bill = state
        .billing
        .generate_bill(consumer_id, &serial, period)
        .await?;

    Ok((StatusCode::CREATED, Json(bill.into())))
}

/// `POST /api/v1/bills/:id/payments`
pub async fn pay_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PayBillRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let bill_id = parse_bill_id(&id)?;

    let payment = state.billing.pay_bill(bill_id, request.method).await?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

/// `GET /api/v1/bills/:id`
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill_id = parse_bill_id(&id)?;

    let bill = state
        .billing
        .get_bill_by_id(bill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill {id} not found")))?;

    Ok(Json(bill.into()))
}

/// `GET /api/v1/bills/:id/payments`
pub async fn list_bill_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let bill_id = parse_bill_id(&id)?;

    let payments = state.billing.get_bill_payments(bill_id).await?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/bills?status=pending`
///
/// Without a filter this surface only exposes pending bills; per-consumer
/// history lives under `/consumers/:id/bills`.
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<BillsQuery>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    match query.status.as_deref() {
        None | Some("pending") => {
            let bills = state.billing.get_pending_bills().await?;
            Ok(Json(bills.into_iter().map(Into::into).collect()))
        }
        Some(other) => Err(ApiError::BadRequest(format!(
            "unsupported status filter '{other}'"
        ))),
    }
}

/// `GET /api/v1/consumers/:id/bills`
pub async fn list_consumer_bills(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let consumer_id = ConsumerId::from_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("invalid consumer id '{id}'")))?;

    let bills = state.billing.get_consumer_bills(consumer_id).await?;

    Ok(Json(bills.into_iter().map(Into::into).collect()))
}

fn parse_bill_id(id: &str) -> Result<BillId, ApiError> {
    BillId::from_str(id).map_err(|_| ApiError::BadRequest(format!("invalid bill id '{id}'")))
}
