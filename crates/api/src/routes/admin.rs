//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET /rooms/{id}/inventory   -> room_inventory
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/rooms/{id}/inventory", get(admin::room_inventory))
}
