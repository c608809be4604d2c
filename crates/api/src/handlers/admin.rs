//! Handlers for the `/admin` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use innkeep_core::dates::normalize_date;
use innkeep_core::error::CoreError;
use innkeep_core::types::DbId;
use innkeep_db::clamp_limit;
use innkeep_db::models::inventory::InventoryEntry;
use innkeep_db::repositories::{InventoryRepo, RoomRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of ledger rows returned.
const DEFAULT_INVENTORY_LIMIT: i64 = 90;

/// Largest number of ledger rows returned.
const MAX_INVENTORY_LIMIT: i64 = 366;

/// Query parameters for `GET /admin/rooms/{id}/inventory`.
#[derive(Debug, Deserialize)]
pub struct InventoryParams {
    /// First night to include; defaults to today (UTC).
    pub from: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/rooms/{id}/inventory
///
/// Raw ledger rows for a room from `from` onwards, in date order.
pub async fn room_inventory(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(room_id): Path<DbId>,
    Query(params): Query<InventoryParams>,
) -> AppResult<Json<DataResponse<Vec<InventoryEntry>>>> {
    let from = match params.from.as_deref() {
        Some(raw) => normalize_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let limit = clamp_limit(params.limit, DEFAULT_INVENTORY_LIMIT, MAX_INVENTORY_LIMIT);

    RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or_else(|| CoreError::room_not_found(room_id))?;

    let entries = InventoryRepo::list_for_room(&state.pool, room_id, from, limit).await?;
    tracing::debug!(admin_id = admin.user_id, room_id, rows = entries.len(), "Inventory inspected");

    Ok(Json(DataResponse { data: entries }))
}
