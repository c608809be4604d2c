//! Request handlers.
//!
//! Handlers stay thin: they extract credentials and input, delegate to the
//! [`crate::engine`] services or a repository in `innkeep_db`, and wrap
//! results in the `{ "data": ... }` envelope.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod otp;
pub mod rooms;
