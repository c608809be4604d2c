//! Integration tests for guest one-time codes and email sessions.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    assert_error, body_json, booking_body, build_test_app_with, get_with_headers, guest_session,
    post_json, seed_room, FailingNotifier, RecordingNotifier,
};
use innkeep_api::auth::password::hash_password;
use innkeep_api::background::housekeeping::purge_once;
use innkeep_api::config::GuestAccessConfig;
use innkeep_api::engine::guest_access::{request_code, resolve_session, verify_code};
use innkeep_core::error::CoreError;
use innkeep_core::otp::{generate_session_token, hash_session_token};
use innkeep_db::models::email_session::CreateEmailSession;
use innkeep_db::models::otp_request::CreateOtpRequest;
use innkeep_db::repositories::{EmailSessionRepo, OtpRequestRepo};
use sqlx::PgPool;

fn app_with_recorder(pool: PgPool) -> (axum::Router, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = build_test_app_with(pool, notifier.clone(), None);
    (app, notifier)
}

async fn request_otp(app: axum::Router, email: &str) -> axum::http::Response<axum::body::Body> {
    post_json(
        app,
        "/api/v1/bookings/otp/request",
        serde_json::json!({ "email": email }),
    )
    .await
}

async fn verify_otp(
    app: axum::Router,
    email: &str,
    code: &str,
) -> axum::http::Response<axum::body::Body> {
    post_json(
        app,
        "/api/v1/bookings/otp/verify",
        serde_json::json!({ "email": email, "code": code }),
    )
    .await
}

// ---------------------------------------------------------------------------
// HTTP flow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn code_exchange_grants_access_to_own_bookings(pool: PgPool) {
    let room = seed_room(&pool, 2, 10_000).await;
    let (app, notifier) = app_with_recorder(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/bookings",
        booking_body(room.id, "2025-12-20", "2025-12-22", "Ada@Example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    post_json(
        app.clone(),
        "/api/v1/bookings",
        booking_body(room.id, "2025-12-20", "2025-12-22", "other@example.com"),
    )
    .await;

    let response = request_otp(app.clone(), " ADA@example.com ").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert!(json["data"]["message"].is_string());

    let code = notifier.last_code_for("ada@example.com").unwrap();
    let response = verify_otp(app.clone(), "ada@example.com", &code).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 48);
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert!(json["data"]["expires_at"].is_string());

    let auth = format!("EmailToken {token}");
    let response =
        get_with_headers(app, "/api/v1/bookings/me", &[("authorization", &auth)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let bookings = json["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["guest_email"], "ada@example.com");
    assert_eq!(bookings[0]["room_name"], "Deluxe Double");
    assert_eq!(bookings[0]["hotel_name"], "Harbour View");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_token_header_is_accepted(pool: PgPool) {
    let (app, notifier) = app_with_recorder(pool);
    let token = guest_session(app.clone(), &notifier, "ada@example.com").await;

    let response =
        get_with_headers(app, "/api/v1/bookings/me", &[("x-email-token", &token)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verified_code_cannot_be_reused(pool: PgPool) {
    let (app, notifier) = app_with_recorder(pool);
    request_otp(app.clone(), "ada@example.com").await;
    let code = notifier.last_code_for("ada@example.com").unwrap();

    let first = verify_otp(app.clone(), "ada@example.com", &code).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = verify_otp(app, "ada@example.com", &code).await;
    assert_error(second, StatusCode::UNAUTHORIZED, "INVALID_OR_EXPIRED_OTP").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_code_does_not_burn_the_real_one(pool: PgPool) {
    let (app, notifier) = app_with_recorder(pool);
    request_otp(app.clone(), "ada@example.com").await;
    let code = notifier.last_code_for("ada@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = verify_otp(app.clone(), "ada@example.com", wrong).await;
    let json = assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_OR_EXPIRED_OTP").await;
    assert_eq!(json["error"], "Invalid or expired OTP");

    let response = verify_otp(app, "ada@example.com", &code).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_latest_code_is_honoured(pool: PgPool) {
    let (app, notifier) = app_with_recorder(pool);
    request_otp(app.clone(), "ada@example.com").await;
    let older = notifier.last_code_for("ada@example.com").unwrap();
    request_otp(app.clone(), "ada@example.com").await;
    let newer = notifier.last_code_for("ada@example.com").unwrap();

    if older != newer {
        let response = verify_otp(app.clone(), "ada@example.com", &older).await;
        assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_OR_EXPIRED_OTP").await;
    }
    let response = verify_otp(app, "ada@example.com", &newer).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sixth_request_in_window_is_rate_limited(pool: PgPool) {
    let (app, _notifier) = app_with_recorder(pool);

    for attempt in 1..=5 {
        let response = request_otp(app.clone(), "ada@example.com").await;
        assert_eq!(response.status(), StatusCode::ACCEPTED, "attempt {attempt}");
    }

    let response = request_otp(app.clone(), "Ada@Example.com").await;
    assert_error(response, StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_REQUESTS").await;

    // The quota is per address.
    let response = request_otp(app, "bob@example.com").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delivery_failure_is_not_reported(pool: PgPool) {
    let app = build_test_app_with(pool, Arc::new(FailingNotifier), None);
    let response = request_otp(app, "ada@example.com").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_input_is_rejected(pool: PgPool) {
    let (app, _notifier) = app_with_recorder(pool);

    let response = request_otp(app.clone(), "not an email").await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = verify_otp(app, "ada@example.com", "12ab56").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_OR_EXPIRED_OTP").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn my_bookings_requires_a_live_session(pool: PgPool) {
    let (app, _notifier) = app_with_recorder(pool);

    let response = get_with_headers(app.clone(), "/api/v1/bookings/me", &[]).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    let response = get_with_headers(
        app,
        "/api/v1/bookings/me",
        &[("authorization", "EmailToken not-a-real-token")],
    )
    .await;
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Engine-level behaviour
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_code_is_rejected(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    OtpRequestRepo::create(
        &mut tx,
        &CreateOtpRequest {
            email: "ada@example.com".to_string(),
            otp_hash: hash_password("123456").unwrap(),
            expires_at: Utc::now() - Duration::seconds(1),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let err = verify_code(&pool, &GuestAccessConfig::default(), "ada@example.com", "123456")
        .await
        .unwrap_err();
    assert_matches!(err.as_core(), Some(CoreError::InvalidOrExpiredOtp));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_session_is_rejected_and_invalidated(pool: PgPool) {
    let (token, token_hash) = generate_session_token();
    let mut tx = pool.begin().await.unwrap();
    EmailSessionRepo::create(
        &mut tx,
        &CreateEmailSession {
            token_hash: token_hash.clone(),
            email: "ada@example.com".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let err = resolve_session(&pool, &token).await.unwrap_err();
    assert_matches!(err.as_core(), Some(CoreError::Unauthorized(_)));

    let stored = EmailSessionRepo::find_by_token_hash(&pool, &token_hash)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.valid);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalidated_session_stays_dead(pool: PgPool) {
    let notifier = RecordingNotifier::default();
    let config = GuestAccessConfig::default();
    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    let code = notifier.last_code_for("ada@example.com").unwrap();
    let issued = verify_code(&pool, &config, "ada@example.com", &code).await.unwrap();

    let identity = resolve_session(&pool, &issued.token).await.unwrap();
    assert_eq!(identity.email, "ada@example.com");

    let session = EmailSessionRepo::find_by_token_hash(&pool, &hash_session_token(&issued.token))
        .await
        .unwrap()
        .unwrap();
    assert!(EmailSessionRepo::invalidate(&pool, session.id).await.unwrap());

    let err = resolve_session(&pool, &issued.token).await.unwrap_err();
    assert_matches!(err.as_core(), Some(CoreError::Unauthorized(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn configured_limit_is_honoured(pool: PgPool) {
    let notifier = RecordingNotifier::default();
    let config = GuestAccessConfig {
        rate_limit: 2,
        ..GuestAccessConfig::default()
    };

    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    let err = request_code(&pool, &notifier, &config, "ada@example.com")
        .await
        .unwrap_err();
    assert_matches!(err.as_core(), Some(CoreError::TooManyRequests(_)));
    assert_eq!(notifier.sent().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_wrong_guesses_burn_the_code(pool: PgPool) {
    let notifier = RecordingNotifier::default();
    let config = GuestAccessConfig {
        max_verify_attempts: 3,
        ..GuestAccessConfig::default()
    };
    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    let code = notifier.last_code_for("ada@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..3 {
        let err = verify_code(&pool, &config, "ada@example.com", wrong)
            .await
            .unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::InvalidOrExpiredOtp));
    }

    let err = verify_code(&pool, &config, "ada@example.com", &code)
        .await
        .unwrap_err();
    assert_matches!(err.as_core(), Some(CoreError::InvalidOrExpiredOtp));

    // A fresh code still works once the burned one is out of the way.
    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    let fresh = notifier.last_code_for("ada@example.com").unwrap();
    assert!(verify_code(&pool, &config, "ada@example.com", &fresh).await.is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guesses_below_the_limit_leave_the_code_usable(pool: PgPool) {
    let notifier = RecordingNotifier::default();
    let config = GuestAccessConfig {
        max_verify_attempts: 3,
        ..GuestAccessConfig::default()
    };
    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    let code = notifier.last_code_for("ada@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..2 {
        assert!(verify_code(&pool, &config, "ada@example.com", wrong).await.is_err());
    }
    assert!(verify_code(&pool, &config, "ada@example.com", &code).await.is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_verifications_issue_one_session(pool: PgPool) {
    let notifier = RecordingNotifier::default();
    let config = GuestAccessConfig::default();
    request_code(&pool, &notifier, &config, "ada@example.com").await.unwrap();
    let code = notifier.last_code_for("ada@example.com").unwrap();

    let attempts = (0..5).map(|_| {
        let pool = pool.clone();
        let config = config.clone();
        let code = code.clone();
        tokio::spawn(async move { verify_code(&pool, &config, "ada@example.com", &code).await })
    });
    let results = futures::future::join_all(attempts).await;

    let wins = results
        .into_iter()
        .map(|r| r.unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(wins, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn housekeeping_purges_only_long_expired_rows(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    for (email, age_hours) in [("old@example.com", 48), ("fresh@example.com", 1)] {
        OtpRequestRepo::create(
            &mut tx,
            &CreateOtpRequest {
                email: email.to_string(),
                otp_hash: "unused".to_string(),
                expires_at: Utc::now() - Duration::hours(age_hours),
            },
        )
        .await
        .unwrap();
        EmailSessionRepo::create(
            &mut tx,
            &CreateEmailSession {
                token_hash: generate_session_token().1,
                email: email.to_string(),
                expires_at: Utc::now() - Duration::hours(age_hours),
            },
        )
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();

    let counts = purge_once(&pool, 24).await.unwrap();
    assert_eq!(counts.otp_requests, 1);
    assert_eq!(counts.email_sessions, 1);

    let again = purge_once(&pool, 24).await.unwrap();
    assert_eq!(again, Default::default());
}
