//! Domain types and pure logic for the Innkeep reservation core.
//!
//! Nothing in this crate touches the database or the network, so everything
//! here is unit-testable in isolation.

pub mod booking_status;
pub mod dates;
pub mod error;
pub mod guest;
pub mod otp;
pub mod pricing;
pub mod roles;
pub mod types;
