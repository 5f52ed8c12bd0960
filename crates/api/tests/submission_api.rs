//! HTTP-level tests for the public intake endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use cardintake_core::submission::SubmissionStatus;
use cardintake_db::repositories::{SubmissionFileRepo, SubmissionRepo};
use cardintake_events::Mailer;
use common::{
    body_json, complete_form, post_multipart, post_raw, MemoryStore, MultipartBody, RecordingMailer,
};
use sqlx::PgPool;

async fn submission_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_required_field_is_rejected_without_side_effects(pool: PgPool) {
    let store = Arc::new(MemoryStore::default());
    let app = common::build_test_app_with(pool.clone(), store.clone(), None);

    let body = MultipartBody::default()
        .text("name", "Brock")
        .text("email", "brock@example.com")
        .text("description", "Rock types")
        .text("address", "12 Boulder Rd")
        .text("city", "   ")
        .text("state", "OR")
        .file("front.jpg", "image/jpeg", b"jpeg-bytes")
        .finish();

    let response = post_multipart(app, "/api/submissions", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Missing required fields: city, zipCode");

    assert_eq!(submission_count(&pool).await, 0);
    assert!(store.keys().is_empty(), "nothing may be uploaded");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_multipart_body_is_bad_request_with_error_body(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_raw(
        app,
        "/api/submissions",
        "application/json",
        r#"{"name": "Brock"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(submission_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn two_files_produce_one_submission_and_two_file_rows(pool: PgPool) {
    let store = Arc::new(MemoryStore::default());
    let app = common::build_test_app_with(pool.clone(), store.clone(), None);

    let front = vec![7u8; 2048];
    let back = vec![9u8; 1000];
    let body = complete_form()
        .file("front.jpg", "image/jpeg", &front)
        .file("back.png", "image/png", &back)
        .finish();

    let response = post_multipart(app, "/api/submissions", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["submission"]["name"], "Brock Harrison");
    assert_eq!(json["submission"]["email"], "brock@example.com");

    let uploaded = json["submission"]["filesUploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 2);
    assert_eq!(uploaded[0]["name"], "front.jpg");
    assert_eq!(uploaded[0]["size"], 2048);
    assert_eq!(uploaded[1]["size"], 1000);

    let id = json["submission"]["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(submission_count(&pool).await, 1);

    let submission = SubmissionRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert_eq!(submission.zip_code.as_deref(), Some("97001"));
    assert_eq!(submission.country.as_deref(), Some("United States"));
    assert_eq!(submission.price_range.as_deref(), Some("300-400"));

    let files = SubmissionFileRepo::list_by_submission(&pool, id).await.unwrap();
    assert_eq!(files.len(), 2);
    let mut sizes: Vec<i64> = files.iter().map(|f| f.file_size).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1000, 2048]);

    for key in store.keys() {
        assert!(key.starts_with(&format!("{id}/")), "key {key} must be scoped to the submission");
    }
    assert!(files.iter().all(|f| f.file_url.starts_with("https://cdn.test/")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_failed_upload_still_succeeds_with_the_rest(pool: PgPool) {
    let store = Arc::new(MemoryStore::failing_on("broken.mp4"));
    let app = common::build_test_app_with(pool.clone(), store.clone(), None);

    let body = complete_form()
        .file("one.jpg", "image/jpeg", b"first")
        .file("broken.mp4", "video/mp4", b"second")
        .file("three.webp", "image/webp", b"third")
        .finish();

    let response = post_multipart(app, "/api/submissions", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["submission"]["filesUploaded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["one.jpg", "three.webp"]);

    let id = json["submission"]["id"].as_str().unwrap().parse().unwrap();
    let files = SubmissionFileRepo::list_by_submission(&pool, id).await.unwrap();
    assert_eq!(files.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_file_parts_are_skipped(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = complete_form().file("", "application/octet-stream", b"").finish();
    let response = post_multipart(app, "/api/submissions", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["submission"]["filesUploaded"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_price_range_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = complete_form().text("priceRange", "a-million").finish();
    let response = post_multipart(app, "/api/submissions", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(submission_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn intake_dispatches_both_notifications_in_background(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = common::build_test_app_with(
        pool.clone(),
        Arc::new(MemoryStore::default()),
        Some(mailer.clone() as Arc<dyn Mailer>),
    );

    let body = complete_form().file("front.jpg", "image/jpeg", b"x").finish();
    let response = post_multipart(app, "/api/submissions", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The dispatch task is detached; give it a moment to finish.
    for _ in 0..50 {
        if mailer.sent.lock().unwrap().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "owner@cards.test");
    assert_eq!(sent[0].subject, "New card collection submission from Brock Harrison");
    assert!(sent[0].text.contains("• front.jpg (1 Bytes)"));
    assert_eq!(sent[1].to, "brock@example.com");
}
