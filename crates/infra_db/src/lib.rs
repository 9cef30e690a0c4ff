//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the metering and billing domains, built on
//! SQLx. The crate is split in two layers:
//!
//! - `repositories`: raw data access speaking in row types and SQL
//! - `adapters`: implementations of the domain port traits
//!   (`MeterRegistry`, `ReadingStore`, `BillStore`) over those repositories
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresBillStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/metering")).await?;
//! let bills = PostgresBillStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::{PostgresBillStore, PostgresMeterRegistry, PostgresReadingStore};
