//! HTTP-level integration tests for tasks, events and the calendar feed.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

async fn user_token(pool: &PgPool, name: &str) -> String {
    let user = common::create_user(pool, name, false).await;
    common::token_for(&user)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_create_parses_datetime_local(pool: PgPool) {
    let token = user_token(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/tasks",
        json!({ "title": " Ship it ", "due_date": "2023-12-25T15:30" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Ship it");
    assert_eq!(json["data"]["due_date"], "2023-12-25T15:30:00Z");
    assert_eq!(json["data"]["priority"], "normal");
    assert_eq!(json["data"]["completed"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_rejects_bad_input(pool: PgPool) {
    let token = user_token(&pool, "alice").await;

    for body in [
        json!({ "title": "x", "due_date": "25/12/2023" }),
        json!({ "title": "   " }),
        json!({ "title": "x", "priority": "urgent" }),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/tasks", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_list_order_and_partial_update(pool: PgPool) {
    let token = user_token(&pool, "alice").await;
    let mut ids = Vec::new();
    for body in [
        json!({ "title": "undated" }),
        json!({ "title": "later", "due_date": "2024-03-01T09:00" }),
        json!({ "title": "sooner", "due_date": "2024-02-01T09:00", "priority": "low" }),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/tasks", body, &token).await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/tasks", &token).await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "later", "undated"]);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/tasks/{}", ids[1]);
    let json = body_json(
        put_json_auth(app, &uri, json!({ "completed": true, "due_date": "" }), &token).await,
    )
    .await;
    assert_eq!(json["data"]["completed"], true);
    assert_eq!(json["data"]["title"], "later");
    assert!(json["data"]["due_date"].is_null());

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tasks_are_private(pool: PgPool) {
    let alice = user_token(&pool, "alice").await;
    let bob = user_token(&pool, "bob").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/tasks", json!({ "title": "mine" }), &alice).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/tasks/{id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/tasks", &bob).await).await;
    assert_eq!(json["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_requires_start_and_order(pool: PgPool) {
    let token = user_token(&pool, "alice").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/events", json!({ "title": "no start" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/events",
        json!({
            "title": "backwards",
            "start_time": "2024-05-01T10:00",
            "end_time": "2024-05-01T09:00"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/events",
        json!({ "title": "standup", "start_time": "2024-05-01T10:00", "location": "" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = body_json(response).await["data"].clone();
    assert!(event["location"].is_null());

    // Moving the end before the existing start is refused too.
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/events/{}", event["id"]);
    let response = put_json_auth(app, &uri, json!({ "end_time": "2024-04-30T10:00" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_calendar_returns_overlapping_events(pool: PgPool) {
    let token = user_token(&pool, "alice").await;
    for body in [
        json!({ "title": "april", "start_time": "2024-04-10T09:00" }),
        json!({ "title": "spanning", "start_time": "2024-04-30T20:00", "end_time": "2024-05-02T08:00" }),
        json!({ "title": "may", "start_time": "2024-05-15T09:00", "end_time": "2024-05-15T10:00" }),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/events", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(
            app,
            "/api/v1/events/calendar?start=2024-05-01T00:00&end=2024-05-31T23:59",
            &token,
        )
        .await,
    )
    .await;
    let entries = json["data"].as_array().unwrap();
    let titles: Vec<&str> = entries.iter().map(|e| e["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["spanning", "may"]);
    assert_eq!(entries[1]["start"], "2024-05-15T09:00:00Z");
    assert_eq!(entries[1]["end"], "2024-05-15T10:00:00Z");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/events/calendar", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/events/calendar?start=soon", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
