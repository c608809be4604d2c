//! Row models and DTOs, one module per table.

pub mod admin_user;
pub mod booking;
pub mod email_session;
pub mod hotel;
pub mod inventory;
pub mod otp_request;
pub mod room;
