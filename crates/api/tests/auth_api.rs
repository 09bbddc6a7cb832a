//! HTTP-level integration tests for registration, login, token refresh,
//! logout and account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_then_login(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "username": "  newbie ", "password": "long-enough" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newbie");
    assert_eq!(json["data"]["role"], "user");
    assert_eq!(json["data"]["is_admin"], false);
    assert!(json["data"].get("password_hash").is_none());

    let app = common::build_test_app(pool);
    let json = login(app, "newbie", "long-enough").await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["role"], "user");
    assert!(json["user"]["last_login_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "shorty", "password": "1234567" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_username_is_409(pool: PgPool) {
    common::create_user(&pool, "taken", false).await;
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "taken", "password": "long-enough" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_login_carries_admin_role(pool: PgPool) {
    common::create_user(&pool, "boss", true).await;
    let app = common::build_test_app(pool);
    let json = login(app, "boss", TEST_PASSWORD).await;
    assert_eq!(json["user"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promoted_user_logs_in_as_admin(pool: PgPool) {
    let user = common::create_user(&pool, "later_admin", false).await;
    assert!(notekeep_db::repositories::UserRepo::set_admin(&pool, user.id, true)
        .await
        .unwrap());

    let app = common::build_test_app(pool);
    let json = login(app, "later_admin", TEST_PASSWORD).await;
    assert_eq!(json["user"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_password_and_unknown_user_are_401(pool: PgPool) {
    common::create_user(&pool, "someone", false).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "username": "someone", "password": "nope-nope" });
    assert_eq!(
        post_json(app, "/api/v1/auth/login", body).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "ghost", "password": "whatever" });
    assert_eq!(
        post_json(app, "/api/v1/auth/login", body).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_locks_after_five_failures(pool: PgPool) {
    common::create_user(&pool, "target", false).await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "username": "target", "password": "wrong-password" });
        let response = post_json(app, "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "username": "target", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    common::create_user(&pool, "refresher", false).await;
    let app = common::build_test_app(pool.clone());
    let first = login(app, "refresher", TEST_PASSWORD).await;
    let refresh_token = first["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The old token was revoked by rotation.
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Only the live session is kept.
    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_drops_revoked_sessions(pool: PgPool) {
    common::create_user(&pool, "returning", false).await;
    let app = common::build_test_app(pool.clone());
    let json = login(app, "returning", TEST_PASSWORD).await;
    let access = json["access_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/logout", serde_json::json!({}), &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    login(app, "returning", TEST_PASSWORD).await;

    let (total, revoked): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_revoked) FROM user_sessions",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((total, revoked), (1, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    common::create_user(&pool, "leaver", false).await;
    let app = common::build_test_app(pool.clone());
    let json = login(app, "leaver", TEST_PASSWORD).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/auth/logout", serde_json::json!({}), &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "refresh_token": refresh });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_returns_current_user(pool: PgPool) {
    let user = common::create_user(&pool, "me", false).await;
    let token = common::token_for(&user);
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["username"], "me");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
