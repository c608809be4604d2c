//! Reservation engine.
//!
//! Each operation here is one database transaction. Handlers stay thin and
//! call into these functions; integration tests drive them directly.
//!
//! - [`reservation`] -- multi-night lock/validate/commit that creates a booking.
//! - [`cancellation`] -- reverses a confirmed booking's ledger effects.
//! - [`guest_access`] -- one-time codes and email sessions.
//! - [`notify`] -- fire-and-forget guest emails.

pub mod cancellation;
pub mod guest_access;
pub mod notify;
pub mod reservation;
