//! Well-known role name constants.
//!
//! Admin accounts are the only role that carries a JWT; guests authenticate
//! with email sessions instead.

pub const ROLE_ADMIN: &str = "admin";
