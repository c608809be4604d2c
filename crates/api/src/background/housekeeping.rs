//! Periodic purge of spent guest credentials.
//!
//! Deletes OTP requests and email sessions whose expiry lies further back
//! than the retention window. Expired rows are already unusable, since
//! validity is checked on every use; this only keeps the tables small.

use std::time::Duration;

use chrono::Utc;
use innkeep_db::repositories::{EmailSessionRepo, OtpRequestRepo};
use innkeep_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the purge runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Totals removed by one purge pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeCounts {
    pub otp_requests: u64,
    pub email_sessions: u64,
}

/// Delete OTP requests and sessions that expired more than
/// `retention_hours` ago.
pub async fn purge_once(pool: &DbPool, retention_hours: i64) -> Result<PurgeCounts, sqlx::Error> {
    let cutoff = Utc::now() - chrono::Duration::hours(retention_hours);
    let otp_requests = OtpRequestRepo::delete_expired_before(pool, cutoff).await?;
    let email_sessions = EmailSessionRepo::delete_expired_before(pool, cutoff).await?;
    Ok(PurgeCounts {
        otp_requests,
        email_sessions,
    })
}

/// Run the purge loop until `cancel` is triggered.
pub async fn run(pool: DbPool, retention_hours: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_hours,
        interval_secs = PURGE_INTERVAL.as_secs(),
        "Housekeeping job started"
    );

    let mut interval = tokio::time::interval(PURGE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Housekeeping job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_once(&pool, retention_hours).await {
                    Ok(counts) if counts != PurgeCounts::default() => {
                        tracing::info!(
                            otp_requests = counts.otp_requests,
                            email_sessions = counts.email_sessions,
                            "Housekeeping: purged expired guest credentials"
                        );
                    }
                    Ok(_) => tracing::debug!("Housekeeping: nothing to purge"),
                    Err(e) => tracing::error!(error = %e, "Housekeeping: purge failed"),
                }
            }
        }
    }
}
