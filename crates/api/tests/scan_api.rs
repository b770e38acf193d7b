mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

const BOUNDARY: &str = "cellar-test-boundary";

/// Build a multipart request with a single `image` field.
fn multipart_request(uri: &str, content_type: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"label.jpg\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-user-id", "1")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn scan_without_user_header_is_unauthorized() {
    let app = common::build_degraded_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn scan_rejects_disallowed_content_type() {
    let app = common::build_degraded_test_app();

    let response = app
        .oneshot(multipart_request("/api/v1/scan", "image/gif", b"GIF89a"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn scan_in_degraded_mode_is_unavailable_not_fabricated() {
    let app = common::build_degraded_test_app();

    let response = app
        .oneshot(multipart_request("/api/v1/scan", "image/jpeg", &[0xFF, 0xD8]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert_eq!(json["code"], "AI_UNAVAILABLE");
}

#[tokio::test]
async fn batch_scan_in_degraded_mode_returns_zero_results() {
    let app = common::build_degraded_test_app();

    let response = app
        .oneshot(multipart_request(
            "/api/v1/scan/batch",
            "image/jpeg",
            &[0xFF, 0xD8],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["data"]["total_detected"], 0);
    assert_eq!(json["data"]["successfully_recognized"], 0);
    assert_eq!(json["data"]["failed"], 0);
    assert!(json["data"]["wines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_check_in_degraded_mode_is_unavailable() {
    let app = common::build_degraded_test_app();

    let response = app
        .oneshot(multipart_request(
            "/api/v1/scan/check",
            "image/webp",
            b"RIFF",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn scan_without_image_field_is_bad_request() {
    let app = common::build_degraded_test_app();

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n\
             --{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/scan")
        .header("x-user-id", "1")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ai_models_reports_degraded_configuration() {
    let app = common::build_degraded_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/ai/models")
                .header("x-user-id", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["data"]["scan"]["model"], "gemini-2.5-flash");
    assert_eq!(json["data"]["scan"]["tier"], "standard");
}
