//! Plain-text guest messages.

use innkeep_core::types::{DbId, StayDate};
use serde::Serialize;

/// A rendered message ready for any delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The booking facts quoted in confirmation and cancellation emails.
#[derive(Debug, Clone)]
pub struct BookingFacts<'a> {
    pub booking_id: DbId,
    pub guest_name: &'a str,
    pub guest_email: &'a str,
    pub hotel_name: &'a str,
    pub room_name: &'a str,
    pub check_in: StayDate,
    pub check_out: StayDate,
    pub total_price_cents: i64,
}

/// Render minor units as a decimal amount, e.g. `12345` as `123.45`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// The one-time code email. The code is the only secret in it.
pub fn otp_code(email: &str, code: &str, ttl_mins: i64) -> Notification {
    Notification {
        to: email.to_string(),
        subject: "Your booking access code".to_string(),
        body: format!(
            "Your one-time code is {code}.\n\n\
             It expires in {ttl_mins} minutes and can be used once.\n\
             If you did not ask for this code you can ignore this email."
        ),
    }
}

pub fn booking_confirmation(facts: &BookingFacts<'_>) -> Notification {
    Notification {
        to: facts.guest_email.to_string(),
        subject: format!("Booking #{} confirmed", facts.booking_id),
        body: format!(
            "Hello {},\n\n\
             Your booking at {} is confirmed.\n\n\
             Room: {}\n\
             Check-in: {}\n\
             Check-out: {}\n\
             Total: {}\n\n\
             To view or cancel this booking, request an access code with this email address.",
            facts.guest_name,
            facts.hotel_name,
            facts.room_name,
            facts.check_in,
            facts.check_out,
            format_cents(facts.total_price_cents),
        ),
    }
}

pub fn booking_cancelled(facts: &BookingFacts<'_>) -> Notification {
    Notification {
        to: facts.guest_email.to_string(),
        subject: format!("Booking #{} cancelled", facts.booking_id),
        body: format!(
            "Hello {},\n\n\
             Your booking at {} ({}, {} to {}) has been cancelled.",
            facts.guest_name, facts.hotel_name, facts.room_name, facts.check_in, facts.check_out,
        ),
    }
}
