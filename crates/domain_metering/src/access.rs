//! Access policy evaluation
//!
//! A single decision point decides whether a caller identity may view a
//! given meter's data. The policy sits behind a trait so the current
//! provisional rule can be replaced by an ownership-aware one without
//! touching the aggregator or the ingestor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use core_kernel::DomainPort;

use crate::meter::MeterSerial;
use crate::ports::MeterRegistry;

/// Opaque caller identity, resolved by the surrounding transport before the
/// core is invoked
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Outcome of an access evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// Policy deciding whether a caller may view a meter's data
///
/// Evaluation is infallible by contract: any internal failure while
/// evaluating (registry lookup error, store outage) must resolve to
/// `Denied`, never to allow-by-default.
#[async_trait]
pub trait AccessPolicy: DomainPort {
    async fn evaluate(&self, serial: &MeterSerial, caller: &CallerId) -> AccessDecision;
}

/// Grants access to any active meter, regardless of caller
///
/// This is the source system's provisional rule, kept behind the
/// [`AccessPolicy`] seam until a real consumer-ownership relationship
/// exists.
pub struct ActiveMeterPolicy {
    registry: Arc<dyn MeterRegistry>,
}

impl ActiveMeterPolicy {
    pub fn new(registry: Arc<dyn MeterRegistry>) -> Self {
        Self { registry }
    }
}

impl DomainPort for ActiveMeterPolicy {}

#[async_trait]
impl AccessPolicy for ActiveMeterPolicy {
    async fn evaluate(&self, serial: &MeterSerial, caller: &CallerId) -> AccessDecision {
        match self.registry.lookup(serial).await {
            Ok(lookup) if lookup.is_active() => AccessDecision::Granted,
            Ok(_) => AccessDecision::Denied,
            Err(error) => {
                warn!(
                    meter = %serial,
                    caller = %caller,
                    %error,
                    "access evaluation failed, denying"
                );
                AccessDecision::Denied
            }
        }
    }
}
