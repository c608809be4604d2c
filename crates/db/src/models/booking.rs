//! Booking model and DTOs.

use innkeep_core::booking_status::BookingStatus;
use innkeep_core::dates::StayRange;
use innkeep_core::error::CoreError;
use innkeep_core::types::{DbId, StayDate, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub hotel_id: DbId,
    pub room_id: DbId,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub check_in: StayDate,
    pub check_out: StayDate,
    pub total_price_cents: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed.as_str()
    }

    /// The booked nights. Rows always satisfy `check_in < check_out`, but
    /// the conversion stays fallible rather than trusting that blindly.
    pub fn stay(&self) -> Result<StayRange, CoreError> {
        StayRange::new(self.check_in, self.check_out)
    }
}

/// A booking joined with its room and hotel display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingSummary {
    pub id: DbId,
    pub hotel_id: DbId,
    pub hotel_name: String,
    pub room_id: DbId,
    pub room_name: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub check_in: StayDate,
    pub check_out: StayDate,
    pub total_price_cents: i64,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a confirmed booking inside a reservation transaction.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub hotel_id: DbId,
    pub room_id: DbId,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub check_in: StayDate,
    pub check_out: StayDate,
    pub total_price_cents: i64,
}
