//! Drives [`HttpAvailabilityOracle`] against an in-process stub service.

use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use innkeep_availability::{AvailabilityOracle, HttpAvailabilityOracle, OracleConfig, OracleError};
use innkeep_core::types::StayDate;
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn oracle(base_url: String, timeout: Duration) -> HttpAvailabilityOracle {
    HttpAvailabilityOracle::new(OracleConfig { base_url, timeout }).unwrap()
}

fn dates() -> (StayDate, StayDate) {
    (
        StayDate::from_ymd_opt(2025, 12, 20).unwrap(),
        StayDate::from_ymd_opt(2025, 12, 22).unwrap(),
    )
}

#[tokio::test]
async fn available_answer_is_passed_through() {
    let router = Router::new().route(
        "/check-availability",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["room_id"], 7);
            assert_eq!(body["check_in"], "2025-12-20");
            assert_eq!(body["check_out"], "2025-12-22");
            Json(json!({"available": true, "reason": ""}))
        }),
    );
    let base = spawn_stub(router).await;
    let (check_in, check_out) = dates();

    let verdict = oracle(base, Duration::from_secs(3))
        .check(7, check_in, check_out)
        .await
        .unwrap();
    assert!(verdict.available);
}

#[tokio::test]
async fn refusal_keeps_the_reason() {
    let router = Router::new().route(
        "/check-availability",
        post(|| async { Json(json!({"available": false, "reason": "sold via partner"})) }),
    );
    let base = spawn_stub(router).await;
    let (check_in, check_out) = dates();

    let verdict = oracle(format!("{base}/"), Duration::from_secs(3))
        .check(1, check_in, check_out)
        .await
        .unwrap();
    assert!(!verdict.available);
    assert_eq!(verdict.reason, "sold via partner");
}

#[tokio::test]
async fn server_error_is_http_status() {
    let router = Router::new().route(
        "/check-availability",
        post(|| async { StatusCode::BAD_GATEWAY }),
    );
    let base = spawn_stub(router).await;
    let (check_in, check_out) = dates();

    let err = oracle(base, Duration::from_secs(3))
        .check(1, check_in, check_out)
        .await
        .unwrap_err();
    assert_matches!(err, OracleError::HttpStatus(502));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let router = Router::new().route(
        "/check-availability",
        post(|| async { "definitely not json" }),
    );
    let base = spawn_stub(router).await;
    let (check_in, check_out) = dates();

    let err = oracle(base, Duration::from_secs(3))
        .check(1, check_in, check_out)
        .await
        .unwrap_err();
    assert_matches!(err, OracleError::Malformed(_));
}

#[tokio::test]
async fn slow_service_times_out() {
    let router = Router::new().route(
        "/check-availability",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"available": true}))
        }),
    );
    let base = spawn_stub(router).await;
    let (check_in, check_out) = dates();

    let err = oracle(base, Duration::from_millis(200))
        .check(1, check_in, check_out)
        .await
        .unwrap_err();
    // Either layer may fire first; both mean "no answer".
    assert_matches!(err, OracleError::Timeout(_) | OracleError::Request(_));
}

#[tokio::test]
async fn unreachable_service_is_a_request_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (check_in, check_out) = dates();

    let err = oracle(format!("http://{addr}"), Duration::from_secs(1))
        .check(1, check_in, check_out)
        .await
        .unwrap_err();
    assert_matches!(err, OracleError::Request(_));
}
