//! One-time code and email-session token primitives.
//!
//! Codes are six decimal digits drawn from a CSPRNG. Only a slow hash of a
//! code is ever persisted (see the API crate's secret hashing). Session tokens
//! are long random strings; the database stores their SHA-256 digest, so a
//! leaked table cannot be replayed as bearer credentials.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of digits in a one-time code.
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of an issued code, in minutes.
pub const DEFAULT_OTP_TTL_MINS: i64 = 10;

/// Default lifetime of an email session, in minutes.
pub const DEFAULT_SESSION_TTL_MINS: i64 = 10;

/// Default number of codes an email may request per window.
pub const DEFAULT_RATE_LIMIT: i64 = 5;

/// Default length of the trailing rate-limit window, in minutes.
pub const DEFAULT_RATE_WINDOW_MINS: i64 = 30;

/// Default number of wrong guesses after which a code is burned.
pub const DEFAULT_MAX_VERIFY_ATTEMPTS: i64 = 5;

/// Length of a generated session token.
pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Generate a uniformly random zero-padded six-digit code.
pub fn generate_code() -> String {
    let value: u32 = rand::rng().random_range(0..1_000_000);
    format!("{value:06}")
}

/// Whether a submitted code has the shape of a code we could have issued.
///
/// Lets callers reject junk before paying for a hash verification.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Generate a new opaque session token.
///
/// Returns `(plaintext, hex_digest)`. The plaintext goes to the
/// client; only the digest is stored.
pub fn generate_session_token() -> (String, String) {
    let token: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let digest = hash_session_token(&token);
    (token, digest)
}

/// Digest used to look up a presented session token.
pub fn hash_session_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
