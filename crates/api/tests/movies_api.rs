//! HTTP-level integration tests for the `/v1/movies` endpoints.
//!
//! Each test gets a fresh migrated database from `#[sqlx::test]`.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, patch_json, post_json, send_json};
use sqlx::PgPool;

async fn create_movie(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(common::build_test_app(pool.clone()), "/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["movie"].clone()
}

fn moana() -> serde_json::Value {
    serde_json::json!({
        "title": "Moana",
        "year": 2016,
        "runtime": "107 mins",
        "genres": ["animation", "adventure"],
    })
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_201_with_location(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/v1/movies", moana()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()["location"].to_str().unwrap().to_string();

    let json = body_json(response).await;
    let id = json["movie"]["id"].as_i64().unwrap();
    assert_eq!(location, format!("/v1/movies/{id}"));
    assert_eq!(json["movie"]["title"], "Moana");
    assert_eq!(json["movie"]["year"], 2016);
    assert_eq!(json["movie"]["runTime"], "107 mins");
    assert_eq!(json["movie"]["version"], 1);
    assert!(json["movie"].get("created_at").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_returns_created_movie(pool: PgPool) {
    let created = create_movie(&pool, moana()).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(common::build_test_app(pool), &format!("/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["movie"], created);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_movie_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/v1/movies/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_changes_only_supplied_fields(pool: PgPool) {
    let created = create_movie(&pool, moana()).await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        common::build_test_app(pool),
        &format!("/v1/movies/{id}"),
        serde_json::json!({"runTime": "108 mins"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["movie"]["runTime"], "108 mins");
    assert_eq!(json["movie"]["title"], "Moana");
    assert_eq!(json["movie"]["version"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_that_breaks_rules_is_rejected(pool: PgPool) {
    let created = create_movie(&pool, moana()).await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/movies/{id}"),
        serde_json::json!({"year": 1500}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was written.
    let json = fetch(&pool, &format!("/v1/movies/{id}")).await;
    assert_eq!(json["movie"]["version"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn matching_expected_version_is_accepted(pool: PgPool) {
    let created = create_movie(&pool, moana()).await;
    let id = created["id"].as_i64().unwrap();

    let response = send_json(
        common::build_test_app(pool),
        Method::PATCH,
        &format!("/v1/movies/{id}"),
        r#"{"title": "Moana (2016)"}"#.to_string(),
        &[("x-expected-version", "1")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_expected_version_returns_409(pool: PgPool) {
    let created = create_movie(&pool, moana()).await;
    let id = created["id"].as_i64().unwrap();

    for expected in ["2", "one"] {
        let response = send_json(
            common::build_test_app(pool.clone()),
            Method::PATCH,
            &format!("/v1/movies/{id}"),
            r#"{"title": "Moana (2016)"}"#.to_string(),
            &[("x-expected-version", expected)],
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT, "expected {expected}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "EDIT_CONFLICT");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_movie_returns_404(pool: PgPool) {
    let response = patch_json(
        common::build_test_app(pool),
        "/v1/movies/999999",
        serde_json::json!({"title": "x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_movie(pool: PgPool) {
    let created = create_movie(&pool, moana()).await;
    let uri = format!("/v1/movies/{}", created["id"].as_i64().unwrap());

    let response = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "movie successfully deleted");

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(common::build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool) {
    for (title, year, runtime, genres) in [
        ("Moana", 2016, "107 mins", vec!["animation", "adventure"]),
        ("Black Panther", 2018, "134 mins", vec!["action", "adventure"]),
        ("Deadpool", 2016, "108 mins", vec!["action", "comedy"]),
        ("The Breakfast Club", 1986, "96 mins", vec!["drama"]),
    ] {
        create_movie(
            pool,
            serde_json::json!({
                "title": title,
                "year": year,
                "runtime": runtime,
                "genres": genres,
            }),
        )
        .await;
    }
}

async fn fetch(pool: &PgPool, uri: &str) -> serde_json::Value {
    body_json(get(common::build_test_app(pool.clone()), uri).await).await
}

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_defaults_to_id_order_with_metadata(pool: PgPool) {
    seed(&pool).await;

    let response = get(common::build_test_app(pool), "/v1/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        titles(&json),
        vec!["Moana", "Black Panther", "Deadpool", "The Breakfast Club"]
    );
    assert_eq!(
        json["metadata"],
        serde_json::json!({
            "current_page": 1,
            "page_size": 20,
            "first_page": 1,
            "last_page": 1,
            "total_records": 4,
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_genres_and_title(pool: PgPool) {
    seed(&pool).await;

    let json = fetch(&pool, "/v1/movies?genres=action,adventure").await;
    assert_eq!(titles(&json), vec!["Black Panther"]);

    let json = fetch(&pool, "/v1/movies?title=CLUB").await;
    assert_eq!(titles(&json), vec!["The Breakfast Club"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_sorts_descending_with_id_tie_break(pool: PgPool) {
    seed(&pool).await;

    let json = fetch(&pool, "/v1/movies?sort=-year").await;
    assert_eq!(
        titles(&json),
        vec!["Black Panther", "Moana", "Deadpool", "The Breakfast Club"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_paginates(pool: PgPool) {
    seed(&pool).await;

    let json = fetch(&pool, "/v1/movies?page=2&page_size=3").await;
    assert_eq!(titles(&json), vec!["The Breakfast Club"]);
    assert_eq!(json["metadata"]["current_page"], 2);
    assert_eq!(json["metadata"]["last_page"], 2);
    assert_eq!(json["metadata"]["total_records"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_listing_has_empty_metadata(pool: PgPool) {
    let json = fetch(&pool, "/v1/movies?title=nothing").await;
    assert_eq!(json["movies"], serde_json::json!([]));
    assert_eq!(json["metadata"], serde_json::json!({}));
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn healthcheck_reports_available(pool: PgPool) {
    let json = fetch(&pool, "/v1/healthcheck").await;
    assert_eq!(json["status"], "available");
    assert_eq!(json["db_healthy"], true);
}
