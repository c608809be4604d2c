//! Reservation coordinator.
//!
//! Lock order is the room row first, then one ledger row per night in
//! ascending date order. Cancellation takes the same room lock, so the two
//! never interleave on a room, and the fixed night order rules out deadlocks
//! between overlapping stays.

use innkeep_availability::AvailabilityOracle;
use innkeep_core::dates::StayRange;
use innkeep_core::error::CoreError;
use innkeep_core::guest::GuestDetails;
use innkeep_core::pricing::total_price_cents;
use innkeep_core::types::DbId;
use innkeep_db::models::booking::{Booking, CreateBooking};
use innkeep_db::models::inventory::InventoryEntry;
use innkeep_db::repositories::{BookingRepo, InventoryRepo, RoomRepo};
use innkeep_db::DbPool;
use serde::Deserialize;

use crate::error::AppResult;

/// A guest's request to book one unit of a room for a stay.
///
/// Dates are raw strings so every accepted encoding goes through the same
/// normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationRequest {
    pub room_id: DbId,
    pub check_in: String,
    pub check_out: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
}

impl ReservationRequest {
    fn guest(&self) -> GuestDetails {
        GuestDetails {
            name: self.guest_name.clone(),
            email: self.guest_email.clone(),
            phone: self.guest_phone.clone(),
        }
    }
}

/// Reserve one unit of a room for every night of the stay.
///
/// Either the booking row and every ledger increment commit together, or
/// nothing does. Returns the confirmed booking.
pub async fn reserve(
    pool: &DbPool,
    oracle: Option<&dyn AvailabilityOracle>,
    request: &ReservationRequest,
) -> AppResult<Booking> {
    // Input validation happens before any lock is taken.
    let guest = request.guest().normalized()?;
    let stay = StayRange::parse(&request.check_in, &request.check_out)?;

    let mut tx = pool.begin().await?;

    let room = RoomRepo::lock_for_update(&mut tx, request.room_id)
        .await?
        .ok_or_else(|| CoreError::room_not_found(request.room_id))?;

    if !room.is_available {
        return Err(CoreError::RoomUnavailable {
            date: stay.check_in(),
        }
        .into());
    }

    let total_price_cents = total_price_cents(&stay, room.price_per_night_cents)?;

    let mut entries: Vec<InventoryEntry> = Vec::with_capacity(stay.nights() as usize);
    for date in stay.nights_iter() {
        let entry = InventoryRepo::get_or_init(&mut tx, room.id, date, room.total_rooms).await?;
        if !entry.has_capacity() {
            tracing::info!(room_id = room.id, %date, "Reservation rejected: night is full");
            return Err(CoreError::RoomUnavailable { date }.into());
        }
        entries.push(entry);
    }

    // Asked while the room lock is held, so the local answer cannot change
    // underneath the external one.
    if let Some(oracle) = oracle {
        oracle
            .check(room.id, stay.check_in(), stay.check_out())
            .await
            .map_err(CoreError::from)?
            .into_result()?;
    }

    let booking = BookingRepo::create(
        &mut tx,
        &CreateBooking {
            hotel_id: room.hotel_id,
            room_id: room.id,
            guest_name: guest.name,
            guest_email: guest.email,
            guest_phone: guest.phone,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            total_price_cents,
        },
    )
    .await?;

    for entry in &entries {
        if InventoryRepo::try_reserve(&mut tx, entry.id).await?.is_none() {
            // Unreachable while the row locks hold; the guard stays anyway.
            return Err(CoreError::RoomUnavailable { date: entry.date }.into());
        }
    }

    tx.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        room_id = booking.room_id,
        check_in = %booking.check_in,
        check_out = %booking.check_out,
        nights = stay.nights(),
        total_price_cents = booking.total_price_cents,
        "Booking confirmed",
    );

    Ok(booking)
}
