//! HTTP-level integration tests for the `/notes` endpoints.
//!
//! Tests cover whole-board replacement, validation limits, and ownership
//! through the parent record.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_empty_auth, post_json_auth, token_for};
use sqlx::PgPool;
use tempo_db::models::user::CreateUser;
use tempo_db::repositories::UserRepo;

/// Create a user row directly and mint a matching access token.
async fn create_user_with_token(pool: &PgPool, username: &str) -> (i64, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "$argon2id$test-only-hash".to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    (user.id, token_for(user.id))
}

/// Start a session for the user and return its record id.
async fn start_session(pool: &PgPool, token: &str) -> i64 {
    let response = post_empty_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/work/start",
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Replacing the board persists content, positions, and ordering.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_replace_and_list_board(pool: PgPool) {
    let (_user_id, token) = create_user_with_token(&pool, "boarduser").await;
    let work_id = start_session(&pool, &token).await;

    let board = serde_json::json!([
        { "content": "second", "pos_x": 10.0, "pos_y": 20.0, "color_tag": "blue", "stack_order": 1 },
        { "content": "first", "stack_order": 0 },
    ]);
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notes?work_id={work_id}"),
        board,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/notes?work_id={work_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let notes = json["data"].as_array().expect("data array");
    assert_eq!(notes.len(), 2);
    // Ordered by stack_order.
    assert_eq!(notes[0]["content"], "first");
    assert_eq!(notes[0]["color_tag"], "yellow", "default color tag");
    assert_eq!(notes[1]["content"], "second");
    assert_eq!(notes[1]["color_tag"], "blue");
    assert_eq!(notes[1]["pos_x"], 10.0);
}

/// Replacing with an empty board clears it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_replace_with_empty_board(pool: PgPool) {
    let (_user_id, token) = create_user_with_token(&pool, "clearer").await;
    let work_id = start_session(&pool, &token).await;

    let board = serde_json::json!([{ "content": "doomed" }]);
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notes?work_id={work_id}"),
        board,
        &token,
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notes?work_id={work_id}"),
        serde_json::json!([]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/notes?work_id={work_id}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

/// Note content over the limit is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_content_too_long(pool: PgPool) {
    let (_user_id, token) = create_user_with_token(&pool, "longwinded").await;
    let work_id = start_session(&pool, &token).await;

    let board = serde_json::json!([{ "content": "x".repeat(2001) }]);
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/notes?work_id={work_id}"),
        board,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// An unknown color tag is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_color_tag(pool: PgPool) {
    let (_user_id, token) = create_user_with_token(&pool, "colorful").await;
    let work_id = start_session(&pool, &token).await;

    let board = serde_json::json!([{ "content": "note", "color_tag": "chartreuse" }]);
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/notes?work_id={work_id}"),
        board,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A board over the note limit is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_too_large(pool: PgPool) {
    let (_user_id, token) = create_user_with_token(&pool, "hoarder").await;
    let work_id = start_session(&pool, &token).await;

    let notes: Vec<_> = (0..101)
        .map(|i| serde_json::json!({ "content": format!("note {i}") }))
        .collect();
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/notes?work_id={work_id}"),
        serde_json::Value::Array(notes),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Another user's record is a 404 for both list and replace.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_owner_scoping(pool: PgPool) {
    let (_alice_id, alice_token) = create_user_with_token(&pool, "alice").await;
    let (_bob_id, bob_token) = create_user_with_token(&pool, "bob").await;
    let work_id = start_session(&pool, &alice_token).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notes?work_id={work_id}"),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let board = serde_json::json!([{ "content": "intruder" }]);
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/notes?work_id={work_id}"),
        board,
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
