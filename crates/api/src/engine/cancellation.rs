//! Cancellation reconciler.

use innkeep_core::error::CoreError;
use innkeep_core::guest::same_identity;
use innkeep_core::types::DbId;
use innkeep_db::models::booking::Booking;
use innkeep_db::models::inventory::ReleaseOutcome;
use innkeep_db::repositories::{BookingRepo, InventoryRepo, RoomRepo};
use innkeep_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;

/// Who is asking for the cancellation.
#[derive(Debug, Clone)]
pub enum CancelActor {
    /// Staff may cancel any booking.
    Admin { user_id: DbId },
    /// A guest holding a verified email session.
    Guest { email: String },
}

impl CancelActor {
    fn may_cancel(&self, booking: &Booking) -> bool {
        match self {
            CancelActor::Admin { .. } => true,
            CancelActor::Guest { email } => same_identity(email, &booking.guest_email),
        }
    }
}

/// Outcome of a cancellation.
#[derive(Debug, Serialize)]
pub struct Cancellation {
    pub booking: Booking,
    /// Whether this call moved the booking out of `confirmed` and returned
    /// its nights to the ledger. `false` on a repeated cancel.
    pub released: bool,
    /// Nights whose ledger entry was actually decremented.
    pub released_nights: usize,
}

/// Cancel a booking, returning its nights to the ledger exactly once.
///
/// Cancelling an already-cancelled booking succeeds without touching the
/// ledger.
pub async fn cancel(pool: &DbPool, booking_id: DbId, actor: &CancelActor) -> AppResult<Cancellation> {
    let mut tx = pool.begin().await?;

    let booking = BookingRepo::lock_for_update(&mut tx, booking_id)
        .await?
        .ok_or_else(|| CoreError::booking_not_found(booking_id))?;

    // Same outer lock as reservations on this room.
    RoomRepo::lock_for_update(&mut tx, booking.room_id).await?;

    if !actor.may_cancel(&booking) {
        return Err(CoreError::Unauthorized("Not authorized to cancel this booking".into()).into());
    }

    let was_confirmed = booking.is_confirmed();
    let mut released_nights = 0;
    if was_confirmed {
        let stay = booking.stay()?;
        for date in stay.nights_iter() {
            match InventoryRepo::release(&mut tx, booking.room_id, date).await? {
                ReleaseOutcome::Released => released_nights += 1,
                outcome => tracing::warn!(
                    booking_id,
                    room_id = booking.room_id,
                    %date,
                    ?outcome,
                    "Ledger had nothing to release for a confirmed night"
                ),
            }
        }
    }

    let booking = BookingRepo::mark_cancelled(&mut tx, booking_id).await?;
    tx.commit().await?;

    let actor_kind = match actor {
        CancelActor::Admin { .. } => "admin",
        CancelActor::Guest { .. } => "guest",
    };
    tracing::info!(
        booking_id,
        room_id = booking.room_id,
        released = was_confirmed,
        released_nights,
        actor = actor_kind,
        "Booking cancelled",
    );

    Ok(Cancellation {
        booking,
        released: was_confirmed,
        released_nights,
    })
}
