//! Request handlers

pub mod readings;
pub mod billing;
pub mod health;
