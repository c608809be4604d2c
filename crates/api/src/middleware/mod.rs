//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the staff member from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`guest::GuestSession`] -- Extracts a verified guest email session.
//! - [`guest::BookingActor`] -- Either of the above, for booking actions.

pub mod auth;
pub mod guest;
pub mod rbac;
