//! Repository for the `email_sessions` table.

use innkeep_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::email_session::{CreateEmailSession, EmailSession};
use crate::DbTx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token_hash, email, expires_at, valid, created_at, updated_at";

/// Provides persistence for guest email sessions.
pub struct EmailSessionRepo;

impl EmailSessionRepo {
    /// Issue a session inside the transaction that consumed the OTP.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &CreateEmailSession,
    ) -> Result<EmailSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_sessions (token_hash, email, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailSession>(&query)
            .bind(&input.token_hash)
            .bind(&input.email)
            .bind(input.expires_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a session by the digest of its bearer token, valid or not.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<EmailSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_sessions WHERE token_hash = $1");
        sqlx::query_as::<_, EmailSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Flip `valid` to false. Returns `true` if the row changed.
    pub async fn invalidate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE email_sessions SET valid = false WHERE id = $1 AND valid = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete sessions that expired before `cutoff`. Returns the count removed.
    pub async fn delete_expired_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_sessions WHERE expires_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
