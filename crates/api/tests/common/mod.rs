#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use innkeep_api::auth::jwt::{generate_access_token, JwtConfig};
use innkeep_api::auth::password::hash_password;
use innkeep_api::config::{GuestAccessConfig, ServerConfig};
use innkeep_api::router::build_app_router;
use innkeep_api::state::AppState;
use innkeep_availability::{AvailabilityOracle, OracleError, OracleVerdict};
use innkeep_core::roles::ROLE_ADMIN;
use innkeep_core::types::{DbId, StayDate};
use innkeep_db::models::admin_user::{AdminUser, CreateAdminUser};
use innkeep_db::models::hotel::CreateHotel;
use innkeep_db::models::room::{CreateRoom, Room};
use innkeep_db::repositories::{AdminUserRepo, HotelRepo, RoomRepo};
use innkeep_events::{DeliveryError, Notification, Notifier};
use sqlx::PgPool;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        guest_access: GuestAccessConfig::default(),
        housekeeping_retention_hours: 24,
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Notifier that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// The code from the most recent OTP email sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .filter(|n| n.to == email)
            .find_map(|n| extract_code(&n.body))
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "recording"
    }
}

/// Notifier that always fails.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _notification: &Notification) -> Result<(), DeliveryError> {
        Err(DeliveryError::Rejected("mailbox unavailable".into()))
    }

    fn channel(&self) -> &'static str {
        "failing"
    }
}

fn extract_code(body: &str) -> Option<String> {
    body.split_whitespace()
        .map(|w| w.trim_end_matches('.'))
        .find(|w| w.len() == 6 && w.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Canned availability service answers.
pub enum StubOracle {
    Approve,
    Refuse(&'static str),
    Unreachable,
}

#[async_trait]
impl AvailabilityOracle for StubOracle {
    async fn check(
        &self,
        _room_id: DbId,
        _check_in: StayDate,
        _check_out: StayDate,
    ) -> Result<OracleVerdict, OracleError> {
        match self {
            StubOracle::Approve => Ok(OracleVerdict {
                available: true,
                reason: String::new(),
            }),
            StubOracle::Refuse(reason) => Ok(OracleVerdict {
                available: false,
                reason: reason.to_string(),
            }),
            StubOracle::Unreachable => Err(OracleError::HttpStatus(503)),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with no oracle and a throwaway
/// recording notifier.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(RecordingNotifier::default()), None)
}

/// Build the full application router with the given collaborators.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app_with(
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
    oracle: Option<Arc<dyn AvailabilityOracle>>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier,
        oracle,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    get_with_headers(app, uri, &[]).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    get_with_headers(app, uri, &[("authorization", &bearer)]).await
}

pub async fn get_with_headers(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_with_headers(app, uri, body, &[]).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    post_json_with_headers(app, uri, body, &[("authorization", &bearer)]).await
}

pub async fn post_json_with_headers(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and stable error code of an error response.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub fn d(y: i32, m: u32, day: u32) -> StayDate {
    StayDate::from_ymd_opt(y, m, day).unwrap()
}

/// Insert a hotel and one bookable room type with the given capacity.
pub async fn seed_room(pool: &PgPool, total_rooms: i32, price_per_night_cents: i64) -> Room {
    let hotel = HotelRepo::create(
        pool,
        &CreateHotel {
            name: "Harbour View".to_string(),
            city: Some("Lisbon".to_string()),
        },
    )
    .await
    .unwrap();
    RoomRepo::create(
        pool,
        &CreateRoom {
            hotel_id: hotel.id,
            room_name: "Deluxe Double".to_string(),
            price_per_night_cents,
            total_rooms,
            is_available: Some(true),
        },
    )
    .await
    .unwrap()
}

/// Insert an active admin whose password is [`ADMIN_PASSWORD`].
pub async fn seed_admin(pool: &PgPool, username: &str) -> AdminUser {
    AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: username.to_string(),
            email: format!("{username}@innkeep.test"),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap()
}

/// A signed admin access token for the test configuration.
pub fn admin_token(user_id: DbId) -> String {
    generate_access_token(user_id, ROLE_ADMIN, &test_config().jwt).unwrap()
}

/// Reservation request body for `POST /bookings`.
pub fn booking_body(room_id: DbId, check_in: &str, check_out: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "room_id": room_id,
        "check_in": check_in,
        "check_out": check_out,
        "guest_name": "Ada Guest",
        "guest_email": email,
        "guest_phone": "+351 900 000 000",
    })
}

/// Run the OTP flow over HTTP and return the session token.
pub async fn guest_session(app: Router, notifier: &RecordingNotifier, email: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/bookings/otp/request",
        serde_json::json!({ "email": email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let code = notifier
        .last_code_for(&email.to_lowercase())
        .expect("an OTP email should have been recorded");

    let response = post_json(
        app,
        "/api/v1/bookings/otp/verify",
        serde_json::json!({ "email": email, "code": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}
