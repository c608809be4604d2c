//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing for admin passwords and one-time codes.
//! - [`jwt`] -- JWT access-token generation and validation for admins.

pub mod jwt;
pub mod password;
