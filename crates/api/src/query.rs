//! Query string types for handlers.

use serde::Deserialize;

/// `?check_in=&check_out=` for availability lookups. Raw strings, so the
/// same normalization as reservations applies.
#[derive(Debug, Deserialize)]
pub struct StayParams {
    pub check_in: String,
    pub check_out: String,
}
