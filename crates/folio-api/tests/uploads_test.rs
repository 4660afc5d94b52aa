//! Upload API integration tests.
//!
//! Run with: `cargo test -p folio-api --test uploads_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use base64::Engine;
use helpers::auth::admin_cookie;
use helpers::fixtures::{minimal_pdf, png_of_size, PNG_SIGNATURE};
use helpers::setup_test_app;
use std::time::Duration;

const MB: usize = 1024 * 1024;

fn file_form(data: Vec<u8>, filename: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(filename.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part("file", part)
}

#[tokio::test]
async fn test_upload_project_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/project-images")
        .add_header("Cookie", admin_cookie())
        .multipart(file_form(png_of_size(4 * MB), "Hero Shot.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let image_path = body["imagePath"].as_str().expect("imagePath missing");
    assert!(image_path.starts_with("/project-images/"));
    assert!(image_path.ends_with("-HeroShot.png"));

    let presigned = app.storage.presigned();
    assert_eq!(presigned.len(), 1);
    assert_eq!(format!("/{}", presigned[0].0), image_path);
    assert_eq!(presigned[0].1, Duration::from_secs(3600));

    let stored = app.sink.objects();
    assert_eq!(stored.len(), 1);
    assert_eq!(format!("/{}", stored[0].key), image_path);
    assert_eq!(stored[0].size, 4 * MB);
    assert_eq!(stored[0].content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_upload_rejects_mismatched_signature() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/project-images")
        .add_header("Cookie", admin_cookie())
        .multipart(file_form(png_of_size(4 * MB), "photo.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_FILE_TYPE");
    assert!(app.storage.presigned().is_empty());
    assert!(app.sink.objects().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_oversized_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/resume-images")
        .add_header("Cookie", admin_cookie())
        .multipart(file_form(png_of_size(5 * MB + 1), "big.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Image too large. Maximum size: 5MB");
    assert!(app.storage.presigned().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_document_type_for_images() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/resume-images")
        .add_header("Cookie", admin_cookie())
        .multipart(file_form(minimal_pdf(), "resume.pdf", "application/pdf"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_session() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/project-images")
        .multipart(file_form(png_of_size(1024), "a.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(app.storage.presigned().is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("title", "no file here");
    let response = app
        .client()
        .post("/api/project-images")
        .add_header("Cookie", admin_cookie())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_resume() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/resume")
        .add_header("Cookie", admin_cookie())
        .multipart(file_form(minimal_pdf(), "My Resume (2024).pdf", "application/pdf"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    let image_path = body["imagePath"].as_str().expect("imagePath missing");
    assert!(image_path.starts_with("/resumes/"));
    assert!(image_path.ends_with("-MyResume2024.pdf"));
}

#[tokio::test]
async fn test_delete_resume_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .delete("/api/resume-images")
        .add_header("Cookie", admin_cookie())
        .json(&serde_json::json!({ "imagePath": "/resume-images/1700000000000-me.png" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(
        app.storage.deleted(),
        vec!["resume-images/1700000000000-me.png".to_string()]
    );
}

#[tokio::test]
async fn test_delete_resume_image_requires_path() {
    let app = setup_test_app().await;

    for body in [serde_json::json!({ "imagePath": "" }), serde_json::json!({})] {
        let response = app
            .client()
            .delete("/api/resume-images")
            .add_header("Cookie", admin_cookie())
            .json(&body)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "imagePath is required");
    }
    assert!(app.storage.deleted().is_empty());
}

#[tokio::test]
async fn test_presign_upload() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/uploads/presign")
        .add_header("Cookie", admin_cookie())
        .json(&serde_json::json!({
            "category": "project-images",
            "filename": "cover.png",
            "contentType": "image/png",
            "fileSize": 4 * MB,
            "leadingBytes": base64::engine::general_purpose::STANDARD.encode(PNG_SIGNATURE),
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let image_path = body["imagePath"].as_str().expect("imagePath missing");
    assert!(image_path.starts_with("/project-images/"));
    assert!(image_path.ends_with("-cover.png"));
    let upload_url = body["uploadUrl"].as_str().expect("uploadUrl missing");
    assert!(upload_url.contains(image_path));
    assert!(upload_url.contains("X-Amz-Expires=3600"));
    assert!(body["expiresAt"].is_string());

    // The client performs the PUT itself
    assert!(app.sink.objects().is_empty());
}

#[tokio::test]
async fn test_presign_rejects_bad_requests() {
    let app = setup_test_app().await;
    let png = base64::engine::general_purpose::STANDARD.encode(PNG_SIGNATURE);

    let cases = [
        (
            serde_json::json!({
                "category": "resumes",
                "filename": "cv.png",
                "contentType": "image/png",
                "fileSize": 1024,
                "leadingBytes": png,
            }),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({
                "category": "project-images",
                "filename": "a.png",
                "contentType": "image/png",
                "fileSize": 1024,
                "leadingBytes": "***",
            }),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({
                "category": "project-images",
                "filename": "a.png",
                "contentType": "image/png",
                "fileSize": 6 * MB,
                "leadingBytes": png,
            }),
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (
            serde_json::json!({
                "category": "videos",
                "filename": "a.mp4",
                "contentType": "video/mp4",
                "fileSize": 1024,
                "leadingBytes": png,
            }),
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (body, expected) in cases {
        let response = app
            .client()
            .post("/api/uploads/presign")
            .add_header("Cookie", admin_cookie())
            .json(&body)
            .await;
        assert_eq!(response.status_code(), expected, "body: {}", body);
    }
    assert!(app.storage.presigned().is_empty());
}
