//! Room model and DTOs.

use innkeep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rooms` table.
///
/// `total_rooms` is the nominal capacity: how many identical units of this
/// room type the hotel sells per night.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub hotel_id: DbId,
    pub room_name: String,
    pub price_per_night_cents: i64,
    pub total_rooms: i32,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a room (catalog seeding and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub hotel_id: DbId,
    pub room_name: String,
    pub price_per_night_cents: i64,
    pub total_rooms: i32,
    pub is_available: Option<bool>,
}
