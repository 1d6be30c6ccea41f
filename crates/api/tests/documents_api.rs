//! HTTP-level integration tests for the `/documents` endpoints.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, expect_json, post_json, post_json_auth, token};
use serde_json::json;

fn pdf() -> serde_json::Value {
    json!({ "name": "aadhaar card.pdf", "mime_type": "application/pdf", "size_bytes": 4096 })
}

#[tokio::test]
async fn test_document_upload_plan_uses_citizen_prefix() {
    let response = post_json_auth(
        build_test_app(),
        "/api/v1/documents/check",
        json!({ "category": "identity_proof", "file": pdf() }),
        &token("citizen-1", "citizen"),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;

    let file_id = json["data"]["file_id"].as_str().unwrap();
    assert_eq!(file_id.len(), 36);
    assert_eq!(
        json["data"]["storage_path"],
        format!("documents/citizen-1/identity_proof/{file_id}")
    );
}

#[tokio::test]
async fn test_document_upload_rejects_unknown_category_and_bad_file() {
    let response = post_json_auth(
        build_test_app(),
        "/api/v1/documents/check",
        json!({ "category": "../secrets", "file": pdf() }),
        &token("citizen-1", "citizen"),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        build_test_app(),
        "/api/v1/documents/check",
        json!({
            "category": "land_record",
            "file": { "name": "rtc.docx", "mime_type": "application/msword", "size_bytes": 10 }
        }),
        &token("citizen-1", "citizen"),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["error"], "Only PDF, JPEG and PNG files are allowed");
}

#[tokio::test]
async fn test_document_upload_requires_token() {
    let response = post_json(
        build_test_app(),
        "/api/v1/documents/check",
        json!({ "category": "identity_proof", "file": pdf() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
