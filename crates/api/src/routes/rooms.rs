//! Route definitions for the public `/rooms` views.

use axum::routing::get;
use axum::Router;

use crate::handlers::rooms;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET /{id}/availability   -> room_availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/availability", get(rooms::room_availability))
}
