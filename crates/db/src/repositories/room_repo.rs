//! Repository for the `rooms` and `hotels` catalog tables.
//!
//! The reservation core only reads the catalog; `create` exists for seeding.

use innkeep_core::types::DbId;
use sqlx::PgPool;

use crate::models::hotel::{CreateHotel, Hotel};
use crate::models::room::{CreateRoom, Room};
use crate::DbTx;

/// Column list for the `rooms` table.
const COLUMNS: &str = "id, hotel_id, room_name, price_per_night_cents, total_rooms, \
    is_available, created_at, updated_at";

/// Column list for the `hotels` table.
const HOTEL_COLUMNS: &str = "id, name, city, created_at, updated_at";

/// Provides read access to rooms, plus the row lock used by reservations.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room.
    pub async fn create(pool: &PgPool, input: &CreateRoom) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (hotel_id, room_name, price_per_night_cents, total_rooms, is_available) \
             VALUES ($1, $2, $3, $4, COALESCE($5, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(input.hotel_id)
            .bind(&input.room_name)
            .bind(input.price_per_night_cents)
            .bind(input.total_rooms)
            .bind(input.is_available)
            .fetch_one(pool)
            .await
    }

    /// Find a room by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a room row for the rest of the transaction.
    ///
    /// This is the outer lock that serializes every reservation and
    /// cancellation touching the room. Returns `None` if the room is absent.
    pub async fn lock_for_update(tx: &mut DbTx<'_>, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Change a room's nominal capacity. Existing ledger entries pick the new
    /// value up the next time a reservation touches them.
    pub async fn set_total_rooms(
        pool: &PgPool,
        id: DbId,
        total_rooms: i32,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("UPDATE rooms SET total_rooms = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(total_rooms)
            .fetch_optional(pool)
            .await
    }
}

/// Provides read access to hotels.
pub struct HotelRepo;

impl HotelRepo {
    /// Insert a new hotel.
    pub async fn create(pool: &PgPool, input: &CreateHotel) -> Result<Hotel, sqlx::Error> {
        let query = format!(
            "INSERT INTO hotels (name, city) VALUES ($1, COALESCE($2, '')) RETURNING {HOTEL_COLUMNS}"
        );
        sqlx::query_as::<_, Hotel>(&query)
            .bind(&input.name)
            .bind(&input.city)
            .fetch_one(pool)
            .await
    }

    /// Find a hotel by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Hotel>, sqlx::Error> {
        let query = format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1");
        sqlx::query_as::<_, Hotel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
