//! Hotel model and DTOs.

use innkeep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `hotels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hotel {
    pub id: DbId,
    pub name: String,
    pub city: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a hotel (catalog seeding and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHotel {
    pub name: String,
    pub city: Option<String>,
}
