//! HTTP API Layer
//!
//! REST API for the metering and billing core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: reading ingestion, consumption queries, bill lifecycle
//! - **Middleware**: caller identification, tracing, audit logging
//! - **DTOs**: request/response data transfer objects
//! - **Error Handling**: consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::with_postgres(pool, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{Currency, Money};
use domain_billing::{BillingEngine, FlatRateTariff};
use domain_metering::{ActiveMeterPolicy, ConsumptionAggregator, ReadingIngestor};
use infra_db::{PostgresBillStore, PostgresMeterRegistry, PostgresReadingStore};

use crate::config::ApiConfig;
use crate::handlers::{billing, health, readings};
use crate::middleware::{audit_middleware, caller_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<ReadingIngestor>,
    pub aggregator: Arc<ConsumptionAggregator>,
    pub billing: Arc<BillingEngine>,
    pub pool: PgPool,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the domain services over the PostgreSQL adapters
    pub fn with_postgres(pool: PgPool, config: ApiConfig) -> Self {
        let registry = Arc::new(PostgresMeterRegistry::new(pool.clone()));
        let readings = Arc::new(PostgresReadingStore::new(pool.clone()));
        let bills = Arc::new(PostgresBillStore::new(pool.clone()));

        let ingestor = Arc::new(ReadingIngestor::new(registry.clone(), readings.clone()));
        let access = Arc::new(ActiveMeterPolicy::new(registry));
        let aggregator = Arc::new(ConsumptionAggregator::new(access, readings));

        let currency = Currency::from_str(&config.tariff_currency).unwrap_or(Currency::USD);
        let tariff = Arc::new(FlatRateTariff::new(Money::new(config.tariff_rate, currency)));
        let billing = Arc::new(BillingEngine::new(aggregator.clone(), tariff, bills));

        Self {
            ingestor,
            aggregator,
            billing,
            pool,
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no caller identity required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Reading and consumption routes
    let meter_routes = Router::new()
        .route("/:serial/consumption", get(readings::get_consumption))
        .route("/:serial/readings", get(readings::list_readings));

    // Bill lifecycle routes
    let bill_routes = Router::new()
        .route("/", post(billing::generate_bill))
        .route("/", get(billing::list_bills))
        .route("/:id", get(billing::get_bill))
        .route("/:id/payments", post(billing::pay_bill))
        .route("/:id/payments", get(billing::list_bill_payments));

    let consumer_routes = Router::new().route("/:id/bills", get(billing::list_consumer_bills));

    // Identified API routes
    let api_routes = Router::new()
        .route("/readings", post(readings::record_reading))
        .nest("/meters", meter_routes)
        .nest("/bills", bill_routes)
        .nest("/consumers", consumer_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn(caller_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
