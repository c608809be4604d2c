//! HTTP implementation of [`AvailabilityOracle`].
//!
//! Sends `POST {base_url}/check-availability` with a JSON body
//! `{room_id, check_in, check_out}` and expects `{available, reason}` back.

use std::time::Duration;

use async_trait::async_trait;
use innkeep_core::types::{DbId, StayDate};
use serde::Serialize;

use crate::oracle::{AvailabilityOracle, OracleError, OracleVerdict};

/// Default budget for one availability check.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Path appended to the configured base URL.
const CHECK_PATH: &str = "/check-availability";

/// Connection settings for the availability service.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl OracleConfig {
    /// Load from `AVAILABILITY_SERVICE_URL` and `AVAILABILITY_TIMEOUT_SECS`.
    ///
    /// Returns `None` when no URL is set, which disables the check.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("AVAILABILITY_SERVICE_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())?;
        let timeout = std::env::var("AVAILABILITY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Some(Self { base_url, timeout })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{CHECK_PATH}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CheckRequest {
    room_id: DbId,
    check_in: StayDate,
    check_out: StayDate,
}

/// Calls the availability service over HTTP.
pub struct HttpAvailabilityOracle {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAvailabilityOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: config.endpoint(),
            timeout: config.timeout,
            client,
        })
    }

    /// Execute a single POST request and decode the verdict.
    async fn try_check(&self, body: &CheckRequest) -> Result<OracleVerdict, OracleError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::HttpStatus(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| OracleError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl AvailabilityOracle for HttpAvailabilityOracle {
    async fn check(
        &self,
        room_id: DbId,
        check_in: StayDate,
        check_out: StayDate,
    ) -> Result<OracleVerdict, OracleError> {
        let body = CheckRequest {
            room_id,
            check_in,
            check_out,
        };

        // The client timeout covers the request; the outer one also bounds
        // reading the body.
        let result = match tokio::time::timeout(self.timeout, self.try_check(&body)).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout(self.timeout)),
        };

        match &result {
            Ok(verdict) => tracing::debug!(
                room_id,
                %check_in,
                %check_out,
                available = verdict.available,
                "Availability service answered"
            ),
            Err(e) => tracing::warn!(
                room_id,
                %check_in,
                %check_out,
                error = %e,
                "Availability service gave no answer"
            ),
        }
        result
    }
}
