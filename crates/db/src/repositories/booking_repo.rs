//! Repository for the `bookings` table.

use innkeep_core::booking_status::BookingStatus;
use innkeep_core::types::{DbId, StayDate};
use sqlx::PgPool;

use crate::models::booking::{Booking, BookingSummary, CreateBooking};
use crate::DbTx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, hotel_id, room_id, guest_name, guest_email, guest_phone, \
    check_in, check_out, total_price_cents, status, created_at, updated_at";

/// Column list for summaries joined with `rooms r` and `hotels h`.
const SUMMARY_COLUMNS: &str = "b.id, b.hotel_id, h.name AS hotel_name, b.room_id, r.room_name, \
    b.guest_name, b.guest_email, b.guest_phone, b.check_in, b.check_out, \
    b.total_price_cents, b.status, b.created_at";

/// Provides persistence for bookings. Bookings are never deleted.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a confirmed booking inside the reservation transaction.
    pub async fn create(tx: &mut DbTx<'_>, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                (hotel_id, room_id, guest_name, guest_email, guest_phone, \
                 check_in, check_out, total_price_cents, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.hotel_id)
            .bind(input.room_id)
            .bind(&input.guest_name)
            .bind(&input.guest_email)
            .bind(&input.guest_phone)
            .bind(input.check_in)
            .bind(input.check_out)
            .bind(input.total_price_cents)
            .bind(BookingStatus::Confirmed.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a booking by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a booking row for the rest of the transaction.
    pub async fn lock_for_update(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set a locked booking's status to cancelled. Idempotent.
    pub async fn mark_cancelled(tx: &mut DbTx<'_>, id: DbId) -> Result<Booking, sqlx::Error> {
        let query = format!("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// List bookings belonging to a guest email (case-insensitive), newest first.
    pub async fn list_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<BookingSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM bookings b \
             JOIN rooms r ON r.id = b.room_id \
             JOIN hotels h ON h.id = b.hotel_id \
             WHERE lower(b.guest_email) = lower($1) \
             ORDER BY b.created_at DESC, b.id DESC"
        );
        sqlx::query_as::<_, BookingSummary>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// List all bookings for staff, newest first, optionally filtered by status.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<BookingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookingSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM bookings b \
             JOIN rooms r ON r.id = b.room_id \
             JOIN hotels h ON h.id = b.hotel_id \
             WHERE ($1::TEXT IS NULL OR b.status = $1) \
             ORDER BY b.created_at DESC, b.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BookingSummary>(&query)
            .bind(status.map(BookingStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count confirmed bookings of a room that occupy the given night.
    ///
    /// Used to audit the ledger: this must never exceed the night's capacity.
    pub async fn count_confirmed_on(
        pool: &PgPool,
        room_id: DbId,
        date: StayDate,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings \
             WHERE room_id = $1 AND status = $2 AND check_in <= $3 AND check_out > $3",
        )
        .bind(room_id)
        .bind(BookingStatus::Confirmed.as_str())
        .bind(date)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
