//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookings, otp};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST /                 -> create_booking
/// GET  /admin            -> list_all_bookings
/// GET  /me               -> list_my_bookings
/// POST /otp/request      -> request_otp
/// POST /otp/verify       -> verify_otp
/// POST /{id}/cancel      -> cancel_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(bookings::create_booking))
        .route("/admin", get(bookings::list_all_bookings))
        .route("/me", get(bookings::list_my_bookings))
        .route("/otp/request", post(otp::request_otp))
        .route("/otp/verify", post(otp::verify_otp))
        .route("/{id}/cancel", post(bookings::cancel_booking))
}
