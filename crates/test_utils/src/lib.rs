//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the metering core
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: pre-built test data for common entities
//! - `builders`: builder patterns for test data construction
//! - `assertions`: custom assertion helpers for domain types
//! - `generators`: property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
