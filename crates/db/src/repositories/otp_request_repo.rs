//! Repository for the `otp_requests` table.

use innkeep_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::otp_request::{CreateOtpRequest, OtpRequest};
use crate::DbTx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, email, otp_hash, expires_at, used, failed_attempts, created_at, updated_at";

/// Provides persistence for issued one-time codes.
pub struct OtpRequestRepo;

impl OtpRequestRepo {
    /// Serialize code issuance for one email until the transaction ends.
    ///
    /// Without it, concurrent requests could each count four recent codes
    /// and all slip under the rate limit.
    pub async fn lock_email(tx: &mut DbTx<'_>, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(email)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Count codes issued to `email` at or after `since`.
    pub async fn count_created_since(
        tx: &mut DbTx<'_>,
        email: &str,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM otp_requests WHERE email = $1 AND created_at >= $2",
        )
        .bind(email)
        .bind(since)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.0)
    }

    /// Persist a newly issued code hash.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &CreateOtpRequest,
    ) -> Result<OtpRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO otp_requests (email, otp_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OtpRequest>(&query)
            .bind(&input.email)
            .bind(&input.otp_hash)
            .bind(input.expires_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock and return the most recent unused, unexpired code for `email`.
    pub async fn latest_active_for_update(
        tx: &mut DbTx<'_>,
        email: &str,
        now: Timestamp,
    ) -> Result<Option<OtpRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM otp_requests \
             WHERE email = $1 AND used = false AND expires_at > $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1 \
             FOR UPDATE"
        );
        sqlx::query_as::<_, OtpRequest>(&query)
            .bind(email)
            .bind(now)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Compare-and-set `used` from false to true.
    ///
    /// Returns `false` if another transaction consumed the code first.
    pub async fn mark_used(tx: &mut DbTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE otp_requests SET used = true WHERE id = $1 AND used = false")
                .bind(id)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a wrong guess against a locked code, burning it once
    /// `max_attempts` wrong guesses have been made.
    ///
    /// Returns `true` if this guess burned the code.
    pub async fn record_failed_attempt(
        tx: &mut DbTx<'_>,
        id: DbId,
        max_attempts: i64,
    ) -> Result<bool, sqlx::Error> {
        // Right-hand sides see the pre-update row.
        let burned: bool = sqlx::query_scalar(
            "UPDATE otp_requests \
             SET failed_attempts = failed_attempts + 1, \
                 used = used OR failed_attempts + 1 >= $2 \
             WHERE id = $1 \
             RETURNING used",
        )
        .bind(id)
        .bind(max_attempts)
        .fetch_one(&mut **tx)
        .await?;
        Ok(burned)
    }

    /// Delete codes that expired before `cutoff`. Returns the count removed.
    pub async fn delete_expired_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM otp_requests WHERE expires_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
