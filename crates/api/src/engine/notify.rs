//! Fire-and-forget booking emails.

use std::sync::Arc;

use innkeep_db::models::booking::Booking;
use innkeep_db::repositories::{HotelRepo, RoomRepo};
use innkeep_db::DbPool;
use innkeep_events::message::{self, BookingFacts};
use innkeep_events::Notifier;

/// Which booking email to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingNotice {
    Confirmed,
    Cancelled,
}

/// Send a booking email on a background task.
///
/// Runs after the booking transaction has committed. Any failure is logged
/// and dropped; the booking itself is already durable.
pub fn spawn_booking_notice(
    pool: DbPool,
    notifier: Arc<dyn Notifier>,
    booking: Booking,
    notice: BookingNotice,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let room_name = match RoomRepo::find_by_id(&pool, booking.room_id).await {
            Ok(room) => room.map(|r| r.room_name).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(booking_id = booking.id, error = %e, "Room lookup for notice failed");
                String::new()
            }
        };
        let hotel_name = match HotelRepo::find_by_id(&pool, booking.hotel_id).await {
            Ok(hotel) => hotel.map(|h| h.name).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(booking_id = booking.id, error = %e, "Hotel lookup for notice failed");
                String::new()
            }
        };

        let facts = BookingFacts {
            booking_id: booking.id,
            guest_name: &booking.guest_name,
            guest_email: &booking.guest_email,
            hotel_name: &hotel_name,
            room_name: &room_name,
            check_in: booking.check_in,
            check_out: booking.check_out,
            total_price_cents: booking.total_price_cents,
        };
        let notification = match notice {
            BookingNotice::Confirmed => message::booking_confirmation(&facts),
            BookingNotice::Cancelled => message::booking_cancelled(&facts),
        };

        match notifier.send(&notification).await {
            Ok(()) => tracing::debug!(booking_id = booking.id, ?notice, "Booking notice sent"),
            Err(e) => tracing::warn!(
                booking_id = booking.id,
                ?notice,
                channel = notifier.channel(),
                error = %e,
                "Booking notice delivery failed"
            ),
        }
    })
}
