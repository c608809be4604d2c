//! Stay date normalization and half-open range expansion.
//!
//! Clients send check-in/check-out either as plain dates (`2025-12-20`) or as
//! date-times (`2025-12-20T14:00:00Z`, `2025-12-20 14:00`). Every encoding is
//! funnelled through [`normalize_date`], which either yields a calendar date or
//! a typed [`CoreError::InvalidDateRange`]. A stay is the half-open interval
//! `[check_in, check_out)`: the check-out night is never occupied.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::CoreError;
use crate::types::StayDate;

/// Longest stay accepted in a single booking. Every night is a locked ledger
/// row, so the range has to stay bounded.
pub const MAX_STAY_NIGHTS: i64 = 366;

/// Naive date-time layouts accepted after plain dates and RFC 3339 fail.
/// `%.f` also matches an absent fractional part.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layout with a space separator, which RFC 3339 parsing rejects.
const SPACED_OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Normalize a client-supplied date or date-time string to a calendar date.
///
/// Date-times with an offset keep the calendar date as written in that offset;
/// they are not shifted to UTC first.
pub fn normalize_date(raw: &str) -> Result<StayDate, CoreError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CoreError::InvalidDateRange("date is required".into()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, SPACED_OFFSET_FORMAT) {
        return Ok(dt.date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.date());
        }
    }

    Err(CoreError::InvalidDateRange(format!(
        "'{value}' is not a recognised date or date-time"
    )))
}

/// A validated half-open stay `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: StayDate,
    check_out: StayDate,
}

impl StayRange {
    /// Build a stay, rejecting empty, inverted, or oversized ranges.
    pub fn new(check_in: StayDate, check_out: StayDate) -> Result<Self, CoreError> {
        if check_in >= check_out {
            return Err(CoreError::InvalidDateRange(
                "check-out must be after check-in".into(),
            ));
        }
        let nights = (check_out - check_in).num_days();
        if nights > MAX_STAY_NIGHTS {
            return Err(CoreError::InvalidDateRange(format!(
                "stay of {nights} nights exceeds the maximum of {MAX_STAY_NIGHTS}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Normalize both raw values and build the stay.
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, CoreError> {
        Self::new(normalize_date(check_in)?, normalize_date(check_out)?)
    }

    pub fn check_in(&self) -> StayDate {
        self.check_in
    }

    pub fn check_out(&self) -> StayDate {
        self.check_out
    }

    /// Number of occupied nights. Always at least one.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every occupied night in ascending order, excluding `check_out`.
    ///
    /// Callers lock ledger rows in exactly this order.
    pub fn nights_iter(&self) -> impl Iterator<Item = StayDate> {
        let check_out = self.check_out;
        self.check_in
            .iter_days()
            .take_while(move |date| *date < check_out)
    }
}
