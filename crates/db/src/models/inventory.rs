//! Inventory ledger model.

use innkeep_core::types::{DbId, StayDate, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `room_inventory` table: one room type on one night.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryEntry {
    pub id: DbId,
    pub room_id: DbId,
    pub date: StayDate,
    pub total_rooms: i32,
    pub booked_rooms: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InventoryEntry {
    /// Units still sellable on this night, never negative.
    pub fn available_rooms(&self) -> i32 {
        (self.total_rooms - self.booked_rooms).max(0)
    }

    /// Whether one more unit can be booked.
    pub fn has_capacity(&self) -> bool {
        self.booked_rooms < self.total_rooms
    }
}

/// Result of releasing one unit back to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// `booked_rooms` was decremented.
    Released,
    /// The entry was already at zero; nothing changed.
    AlreadyEmpty,
    /// No entry exists for the night; treated as already reconciled.
    Missing,
}

/// Per-night availability as shown to guests.
#[derive(Debug, Clone, Serialize)]
pub struct NightAvailability {
    pub date: StayDate,
    pub total_rooms: i32,
    pub booked_rooms: i32,
    pub available_rooms: i32,
}

impl From<&InventoryEntry> for NightAvailability {
    fn from(entry: &InventoryEntry) -> Self {
        Self {
            date: entry.date,
            total_rooms: entry.total_rooms,
            booked_rooms: entry.booked_rooms,
            available_rooms: entry.available_rooms(),
        }
    }
}
