//! PostgreSQL port adapters
//!
//! Each adapter implements one domain port over its repository, translating
//! between row types and domain models and between `DatabaseError` and
//! `PortError`.

pub mod meter;
pub mod reading;
pub mod billing;

pub use meter::PostgresMeterRegistry;
pub use reading::PostgresReadingStore;
pub use billing::PostgresBillStore;

use core_kernel::PortError;

use crate::error::DatabaseError;

/// Converts a database error to a port error
pub(crate) fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(msg) => PortError::NotFound {
            entity_type: "record".to_string(),
            id: msg,
        },
        DatabaseError::DuplicateEntry(msg)
        | DatabaseError::ForeignKeyViolation(msg)
        | DatabaseError::ConstraintViolation(msg) => PortError::Conflict { message: msg },
        DatabaseError::ConnectionFailed(msg) => PortError::Connection {
            message: msg,
            source: None,
        },
        DatabaseError::PoolExhausted => PortError::Connection {
            message: "connection pool exhausted".to_string(),
            source: None,
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}
