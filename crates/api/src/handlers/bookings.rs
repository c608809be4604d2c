//! Handlers for the `/bookings` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use innkeep_core::booking_status::BookingStatus;
use innkeep_core::types::DbId;
use innkeep_db::models::booking::{Booking, BookingSummary};
use innkeep_db::repositories::BookingRepo;
use innkeep_db::{clamp_limit, clamp_offset};
use serde::Deserialize;

use crate::engine::cancellation::{self, Cancellation};
use crate::engine::notify::{spawn_booking_notice, BookingNotice};
use crate::engine::reservation::{self, ReservationRequest};
use crate::error::AppResult;
use crate::middleware::guest::{BookingActor, GuestSession};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the admin booking list.
const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page size for the admin booking list.
const MAX_LIST_LIMIT: i64 = 200;

/// Query parameters for `GET /bookings/admin`.
#[derive(Debug, Deserialize)]
pub struct BookingListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/bookings
///
/// Reserve a room for a stay. Returns the confirmed booking with 201 Created;
/// the confirmation email goes out in the background.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(input): Json<ReservationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    let booking = reservation::reserve(&state.pool, state.oracle.as_deref(), &input).await?;

    spawn_booking_notice(
        state.pool.clone(),
        state.notifier.clone(),
        booking.clone(),
        BookingNotice::Confirmed,
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/v1/bookings/me
///
/// Bookings belonging to the email proven by the guest's session.
pub async fn list_my_bookings(
    State(state): State<AppState>,
    GuestSession(guest): GuestSession,
) -> AppResult<Json<DataResponse<Vec<BookingSummary>>>> {
    let bookings = BookingRepo::list_by_email(&state.pool, &guest.email).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/admin
///
/// Every booking, newest first, optionally filtered by `status`.
pub async fn list_all_bookings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<DataResponse<Vec<BookingSummary>>>> {
    let status = params
        .status
        .as_deref()
        .map(BookingStatus::parse)
        .transpose()?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let bookings = BookingRepo::list_all(&state.pool, status, limit, offset).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// POST /api/v1/bookings/{id}/cancel
///
/// Cancel a booking as its guest or as an admin. Repeating the call succeeds
/// with `released: false`.
pub async fn cancel_booking(
    State(state): State<AppState>,
    BookingActor(actor): BookingActor,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Cancellation>>> {
    let outcome = cancellation::cancel(&state.pool, booking_id, &actor).await?;

    if outcome.released {
        spawn_booking_notice(
            state.pool.clone(),
            state.notifier.clone(),
            outcome.booking.clone(),
            BookingNotice::Cancelled,
        );
    }

    Ok(Json(DataResponse { data: outcome }))
}
