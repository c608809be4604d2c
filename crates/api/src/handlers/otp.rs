//! Handlers for guest one-time codes under `/bookings/otp`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::engine::guest_access::{self, IssuedSession};
use crate::error::AppResult;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /bookings/otp/request`.
#[derive(Debug, Deserialize)]
pub struct OtpRequestBody {
    pub email: String,
}

/// Request body for `POST /bookings/otp/verify`.
#[derive(Debug, Deserialize)]
pub struct OtpVerifyBody {
    pub email: String,
    pub code: String,
}

/// POST /api/v1/bookings/otp/request
///
/// Always answers 202 with the same message unless rate limited, whether or
/// not the address has bookings or the email could be delivered.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<MessageResponse>>)> {
    guest_access::request_code(
        &state.pool,
        state.notifier.as_ref(),
        &state.config.guest_access,
        &input.email,
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: MessageResponse {
                message: "If the address is valid, a verification code has been sent.",
            },
        }),
    ))
}

/// POST /api/v1/bookings/otp/verify
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpVerifyBody>,
) -> AppResult<Json<DataResponse<IssuedSession>>> {
    let session = guest_access::verify_code(
        &state.pool,
        &state.config.guest_access,
        &input.email,
        &input.code,
    )
    .await?;
    Ok(Json(DataResponse { data: session }))
}
