//! Request/Response data transfer objects

pub mod readings;
pub mod billing;
