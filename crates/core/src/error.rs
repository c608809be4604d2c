use crate::types::{DbId, StayDate};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Room is fully booked on {date}")]
    RoomUnavailable { date: StayDate },

    #[error("Room rejected by availability service: {0}")]
    RoomUnavailableExternal(String),

    #[error("Availability check unavailable: {0}")]
    AvailabilityCheckUnavailable(String),

    #[error("Invalid or expired OTP")]
    InvalidOrExpiredOtp,

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing room.
    pub fn room_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Room", id }
    }

    /// Shorthand for a missing booking.
    pub fn booking_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Booking",
            id,
        }
    }

    /// Whether a client may retry the same request later and expect a
    /// different outcome without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::AvailabilityCheckUnavailable(_) | CoreError::TooManyRequests(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_unavailable_names_the_date() {
        let date = StayDate::from_ymd_opt(2025, 12, 21).unwrap();
        let err = CoreError::RoomUnavailable { date };
        assert_eq!(err.to_string(), "Room is fully booked on 2025-12-21");
    }

    #[test]
    fn not_found_shorthands() {
        assert_eq!(
            CoreError::room_not_found(7).to_string(),
            "Entity not found: Room with id 7"
        );
        assert_eq!(
            CoreError::booking_not_found(9).to_string(),
            "Entity not found: Booking with id 9"
        );
    }

    #[test]
    fn only_dependent_service_and_rate_limit_errors_are_retryable() {
        assert!(CoreError::AvailabilityCheckUnavailable("timeout".into()).is_retryable());
        assert!(CoreError::TooManyRequests("slow down".into()).is_retryable());
        assert!(!CoreError::InvalidOrExpiredOtp.is_retryable());
        assert!(!CoreError::Validation("bad".into()).is_retryable());
    }
}
