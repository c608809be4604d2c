//! HTTP-level integration tests for admin login and bootstrap.

mod common;

use axum::http::StatusCode;
use common::{assert_error, body_json, get_auth, post_json, seed_admin, ADMIN_PASSWORD};
use innkeep_api::bootstrap::{ensure_admin, BootstrapAdmin};
use innkeep_db::repositories::AdminUserRepo;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::http::Response<axum::body::Body> {
    post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_a_usable_admin_token(pool: PgPool) {
    let admin = seed_admin(&pool, "frontdesk").await;
    let app = common::build_test_app(pool.clone());

    let response = login(app.clone(), "frontdesk", ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], admin.id);
    assert_eq!(json["user"]["username"], "frontdesk");
    assert_eq!(json["user"]["role"], "admin");

    let token = json["access_token"].as_str().unwrap();
    let response = get_auth(app, "/api/v1/bookings/admin", token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = AdminUserRepo::find_by_username(&pool, "frontdesk")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_user_look_the_same(pool: PgPool) {
    seed_admin(&pool, "frontdesk").await;
    let app = common::build_test_app(pool);

    let wrong = login(app.clone(), "frontdesk", "not-the-password").await;
    let wrong = assert_error(wrong, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    let unknown = login(app, "ghost", ADMIN_PASSWORD).await;
    let unknown = assert_error(unknown, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;

    assert_eq!(wrong["error"], unknown["error"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_admin_is_forbidden(pool: PgPool) {
    let admin = seed_admin(&pool, "former").await;
    assert!(AdminUserRepo::deactivate(&pool, admin.id).await.unwrap());
    let app = common::build_test_app(pool);

    let response = login(app, "former", ADMIN_PASSWORD).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_admin_is_created_once(pool: PgPool) {
    let bootstrap = BootstrapAdmin {
        username: "owner".to_string(),
        email: "owner@innkeep.test".to_string(),
        password: "a-long-enough-password".to_string(),
    };

    let created = ensure_admin(&pool, &bootstrap).await.unwrap();
    assert!(created.is_some());
    let again = ensure_admin(&pool, &bootstrap).await.unwrap();
    assert!(again.is_none());

    let app = common::build_test_app(pool);
    let response = login(app, "owner", "a-long-enough-password").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_rejects_weak_password(pool: PgPool) {
    let bootstrap = BootstrapAdmin {
        username: "owner".to_string(),
        email: "owner@innkeep.test".to_string(),
        password: "short".to_string(),
    };

    let err = ensure_admin(&pool, &bootstrap).await.unwrap_err();
    assert!(matches!(
        err.as_core(),
        Some(innkeep_core::error::CoreError::Validation(_))
    ));
    assert!(AdminUserRepo::find_by_username(&pool, "owner")
        .await
        .unwrap()
        .is_none());
}
