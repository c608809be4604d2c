pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod rooms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          admin login (public)
///
/// /bookings                            create (public)
/// /bookings/admin                      list all (admin only)
/// /bookings/me                         list own (guest session)
/// /bookings/otp/request                request a code (public)
/// /bookings/otp/verify                 exchange a code for a session (public)
/// /bookings/{id}/cancel                cancel (admin or owning guest)
///
/// /rooms/{id}/availability             per-night availability (public)
///
/// /admin/rooms/{id}/inventory          raw ledger rows (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/bookings", bookings::router())
        .nest("/rooms", rooms::router())
        .nest("/admin", admin::router())
}
