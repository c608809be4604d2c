//! Repository for the `room_inventory` ledger.
//!
//! Every mutating function runs inside the caller's transaction and relies on
//! the row locks that transaction holds. Callers must lock the owning room row
//! first and then touch nights in ascending date order.

use innkeep_core::types::{DbId, StayDate};
use sqlx::PgPool;

use crate::models::inventory::{InventoryEntry, ReleaseOutcome};
use crate::DbTx;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, date, total_rooms, booked_rooms, created_at, updated_at";

/// Provides ledger operations on per-night inventory rows.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Fetch the entry for `(room_id, date)`, creating it from the room's
    /// nominal capacity if absent. The returned row is locked until the
    /// transaction ends.
    ///
    /// An existing entry has its `total_rooms` refreshed to the current
    /// nominal capacity, but never below the units already booked on that
    /// night: capacity changes apply going forward and do not un-count
    /// bookings the ledger already holds.
    pub async fn get_or_init(
        tx: &mut DbTx<'_>,
        room_id: DbId,
        date: StayDate,
        nominal_total: i32,
    ) -> Result<InventoryEntry, sqlx::Error> {
        // ON CONFLICT DO UPDATE takes the row lock even when the value is
        // unchanged, so the upsert doubles as SELECT ... FOR UPDATE.
        let query = format!(
            "INSERT INTO room_inventory (room_id, date, total_rooms, booked_rooms) \
             VALUES ($1, $2, $3, 0) \
             ON CONFLICT (room_id, date) DO UPDATE \
                SET total_rooms = GREATEST(EXCLUDED.total_rooms, room_inventory.booked_rooms) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(room_id)
            .bind(date)
            .bind(nominal_total.max(0))
            .fetch_one(&mut **tx)
            .await
    }

    /// Book one unit on the entry's night if capacity remains.
    ///
    /// Returns the updated entry, or `None` (with no side effects) when the
    /// night is already full.
    pub async fn try_reserve(
        tx: &mut DbTx<'_>,
        entry_id: DbId,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE room_inventory SET booked_rooms = booked_rooms + 1 \
             WHERE id = $1 AND booked_rooms < total_rooms \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(entry_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Return one unit for `(room_id, date)`, floored at zero.
    ///
    /// Releasing an empty or missing entry is not an error: retried
    /// cancellations and cleaned-up history must not block a cancel.
    pub async fn release(
        tx: &mut DbTx<'_>,
        room_id: DbId,
        date: StayDate,
    ) -> Result<ReleaseOutcome, sqlx::Error> {
        let locked: Option<(DbId, i32)> = sqlx::query_as(
            "SELECT id, booked_rooms FROM room_inventory \
             WHERE room_id = $1 AND date = $2 \
             FOR UPDATE",
        )
        .bind(room_id)
        .bind(date)
        .fetch_optional(&mut **tx)
        .await?;

        let Some((id, booked_rooms)) = locked else {
            return Ok(ReleaseOutcome::Missing);
        };
        if booked_rooms <= 0 {
            return Ok(ReleaseOutcome::AlreadyEmpty);
        }

        sqlx::query(
            "UPDATE room_inventory SET booked_rooms = booked_rooms - 1 \
             WHERE id = $1 AND booked_rooms > 0",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(ReleaseOutcome::Released)
    }

    /// Find the entry for a single night without locking it.
    pub async fn find(
        pool: &PgPool,
        room_id: DbId,
        date: StayDate,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM room_inventory WHERE room_id = $1 AND date = $2");
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(room_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// List existing entries for `[from, to)` in date order, without locking.
    ///
    /// Nights with no entry are simply absent from the result.
    pub async fn list_for_range(
        pool: &PgPool,
        room_id: DbId,
        from: StayDate,
        to: StayDate,
    ) -> Result<Vec<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM room_inventory \
             WHERE room_id = $1 AND date >= $2 AND date < $3 \
             ORDER BY date"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(room_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// List every entry for a room from `from` onwards (admin inspection).
    pub async fn list_for_room(
        pool: &PgPool,
        room_id: DbId,
        from: StayDate,
        limit: i64,
    ) -> Result<Vec<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM room_inventory \
             WHERE room_id = $1 AND date >= $2 \
             ORDER BY date \
             LIMIT $3"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(room_id)
            .bind(from)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
