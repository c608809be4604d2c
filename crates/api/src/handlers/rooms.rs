//! Handlers for the public `/rooms` views.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use innkeep_core::dates::StayRange;
use innkeep_core::error::CoreError;
use innkeep_core::pricing::total_price_cents;
use innkeep_core::types::{DbId, StayDate};
use innkeep_db::models::inventory::NightAvailability;
use innkeep_db::repositories::{InventoryRepo, RoomRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::query::StayParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Per-night availability of a room over a stay.
#[derive(Debug, Serialize)]
pub struct RoomAvailability {
    pub room_id: DbId,
    pub check_in: StayDate,
    pub check_out: StayDate,
    /// Whether a reservation for the whole stay would currently pass the
    /// local ledger check.
    pub bookable: bool,
    pub total_price_cents: i64,
    pub nights: Vec<NightAvailability>,
}

/// GET /api/v1/rooms/{id}/availability?check_in=&check_out=
///
/// Read-only snapshot without locks. Nights the ledger has never touched
/// report the room's nominal capacity.
pub async fn room_availability(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Query(params): Query<StayParams>,
) -> AppResult<Json<DataResponse<RoomAvailability>>> {
    let stay = StayRange::parse(&params.check_in, &params.check_out)?;

    let room = RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or_else(|| CoreError::room_not_found(room_id))?;

    let mut recorded: HashMap<StayDate, NightAvailability> =
        InventoryRepo::list_for_range(&state.pool, room.id, stay.check_in(), stay.check_out())
            .await?
            .iter()
            .map(|entry| (entry.date, NightAvailability::from(entry)))
            .collect();

    let nights: Vec<NightAvailability> = stay
        .nights_iter()
        .map(|date| {
            recorded.remove(&date).unwrap_or(NightAvailability {
                date,
                total_rooms: room.total_rooms,
                booked_rooms: 0,
                available_rooms: room.total_rooms.max(0),
            })
        })
        .collect();

    let bookable = room.is_available && nights.iter().all(|n| n.available_rooms > 0);

    Ok(Json(DataResponse {
        data: RoomAvailability {
            room_id: room.id,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            bookable,
            total_price_cents: total_price_cents(&stay, room.price_per_night_cents)?,
            nights,
        },
    }))
}
