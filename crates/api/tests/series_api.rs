//! HTTP-level tests for the `/api/v1/series` endpoints.
//!
//! Requests go straight to the router via `tower::ServiceExt`. Rejections
//! that happen before any database access run against a lazy pool; the
//! rest use a fresh `#[sqlx::test]` database.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Request validation (no database)
// ---------------------------------------------------------------------------

async fn rejected(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, uri).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn order_without_sortby_returns_400() {
    let (status, json) = rejected("/api/v1/series?order=asc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_order_token_returns_400() {
    let (status, json) = rejected("/api/v1/series?sortby=name&order=up").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn mismatched_sort_lengths_return_400() {
    let (status, json) =
        rejected("/api/v1/series?sortby=name,type_name,id&order=asc,desc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn negative_offset_returns_400() {
    let (status, json) = rejected("/api/v1/series?offset=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_projection_field_returns_400() {
    let (status, json) = rejected("/api/v1/series?fields=name,rating").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "UNKNOWN_FIELD");
    assert!(json["error"].as_str().unwrap().contains("rating"));
}

#[tokio::test]
async fn malformed_filter_query_returns_400() {
    let (status, json) = rejected("/api/v1/series?query=name").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/series/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// CRUD and listing (database)
// ---------------------------------------------------------------------------

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/series", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_then_get_by_id(pool: PgPool) {
    let created = create(&pool, json!({"name": "Berserk", "type_name": "Manga"})).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], serde_json::Value::Null);
    assert_eq!(created["tags"], json!([]));

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/series/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Berserk");
    assert_eq!(json["data"]["type_name"], "Manga");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_returns_409(pool: PgPool) {
    create(&pool, json!({"name": "Berserk"})).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/series", json!({"name": "Berserk"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_series_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/series/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/series/by-name/nothing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_by_name_matches_substring(pool: PgPool) {
    create(&pool, json!({"name": "Vinland Saga"})).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/series/by-name/saga").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Vinland Saga");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete(pool: PgPool) {
    let created = create(&pool, json!({"name": "Berserk"})).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/series/{id}"),
        json!({"description": "Guts"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["description"], "Guts");
    assert_eq!(json["data"]["name"], "Berserk");

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/series/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/series/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_all_returns_every_series(pool: PgPool) {
    for name in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"] {
        create(&pool, json!({ "name": name })).await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/series/all").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    let rows = data.as_array().unwrap();
    // More than the default page size: this listing is not paginated.
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["name"], "A");
    assert_eq!(rows[11]["name"], "L");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_null_status_clears_it(pool: PgPool) {
    let status: i64 = sqlx::query_scalar("SELECT id FROM statuses WHERE name = 'hiatus'")
        .fetch_one(&pool)
        .await
        .unwrap();
    let created = create(&pool, json!({ "name": "Berserk", "status_id": status })).await;
    assert_eq!(created["status"]["name"], "hiatus");
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/series/{id}"),
        json!({ "status_id": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_sorts_and_projects(pool: PgPool) {
    create(&pool, json!({"name": "Berserk", "type_name": "Manga"})).await;
    create(&pool, json!({"name": "Solo Leveling", "type_name": "Manhwa"})).await;
    create(&pool, json!({"name": "Vinland Saga", "type_name": "Manga"})).await;

    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/series?query=type_name:Manga&fields=name&sortby=name&order=desc",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"],
        json!([{"name": "Vinland Saga"}, {"name": "Berserk"}])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_unknown_filter_path_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/series?query=publisher.name:x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNKNOWN_FIELD");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
