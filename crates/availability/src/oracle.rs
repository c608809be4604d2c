//! The availability oracle seam.

use std::time::Duration;

use async_trait::async_trait;
use innkeep_core::error::CoreError;
use innkeep_core::types::{DbId, StayDate};
use serde::{Deserialize, Serialize};

/// The service's answer for one stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleVerdict {
    pub available: bool,
    #[serde(default)]
    pub reason: String,
}

impl OracleVerdict {
    /// Map the verdict onto the reservation outcome: a refusal becomes
    /// `RoomUnavailableExternal` carrying the service's reason.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.available {
            return Ok(());
        }
        let reason = if self.reason.trim().is_empty() {
            "room not available".to_string()
        } else {
            self.reason
        };
        Err(CoreError::RoomUnavailableExternal(reason))
    }
}

/// Error type for oracle calls. Every variant means "no answer".
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The underlying HTTP request failed (network, DNS, connect, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Availability service returned HTTP {0}")]
    HttpStatus(u16),

    /// No response within the configured budget.
    #[error("Availability service timed out after {0:?}")]
    Timeout(Duration),

    /// A 2xx response whose body is not a verdict.
    #[error("Malformed availability response: {0}")]
    Malformed(String),
}

impl From<OracleError> for CoreError {
    fn from(err: OracleError) -> Self {
        CoreError::AvailabilityCheckUnavailable(err.to_string())
    }
}

/// Asks an independent service whether a stay may be sold.
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    async fn check(
        &self,
        room_id: DbId,
        check_in: StayDate,
        check_out: StayDate,
    ) -> Result<OracleVerdict, OracleError>;
}
