mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use qr_shortener::domain::repositories::UrlRepository;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_url_defaults() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["short_code"].as_str().unwrap();

    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["original_url"], "https://example.com");
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(body["qr_error_correction"], "M");
    assert_eq!(body["qr_size"], 256);

    let data_url = body["qr_data_url"].as_str().unwrap();
    assert!(data_url.starts_with("data:image/png;base64,"));
    assert_eq!(common::png_dimensions(data_url), (256, 256));
}

#[tokio::test]
async fn test_create_url_with_qr_options() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({
            "original_url": "https://example.com/path?q=1",
            "qr_error_correction": " h ",
            "qr_size": 512
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["qr_error_correction"], "H");
    assert_eq!(body["qr_size"], 512);
    assert_eq!(
        common::png_dimensions(body["qr_data_url"].as_str().unwrap()),
        (512, 512)
    );
}

#[tokio::test]
async fn test_create_url_null_qr_options_use_defaults() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({
            "original_url": "https://example.com",
            "qr_error_correction": null,
            "qr_size": null
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["qr_error_correction"], "M");
    assert_eq!(body["qr_size"], 256);
    assert_eq!(
        common::png_dimensions(body["qr_data_url"].as_str().unwrap()),
        (256, 256)
    );
}

#[tokio::test]
async fn test_create_url_invalid_url() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "not a url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid URL format");
}

#[tokio::test]
async fn test_create_url_missing_url() {
    let app = common::test_app();

    let response = app.server.post("/api/v1/urls").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid URL format");
}

#[tokio::test]
async fn test_create_url_bad_qr_option_leaves_no_record() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://example.com", "qr_size": 64 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "invalid qr size 64 (use 128-1024)"
    );

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://example.com", "qr_error_correction": "X" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(app.repository.summary().await.unwrap().links, 0);
}

#[tokio::test]
async fn test_create_url_undecodable_body() {
    let app = common::test_app();

    let response = app.server.post("/api/v1/urls").text("not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid request");

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": 42 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid request");
}

#[tokio::test]
async fn test_create_url_derives_base_from_headers() {
    let app = common::test_app_with(None, 100);

    let response = app
        .server
        .post("/api/v1/urls")
        .add_header(
            HeaderName::from_static("host"),
            HeaderValue::from_static("links.example"),
        )
        .add_header(
            HeaderName::from_static("x-forwarded-proto"),
            HeaderValue::from_static("https"),
        )
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["short_code"].as_str().unwrap();
    assert_eq!(body["short_url"], format!("https://links.example/{code}"));
}

#[tokio::test]
async fn test_create_many_distinct_codes() {
    let app = common::test_app();
    let mut codes = std::collections::HashSet::new();

    for i in 0..25 {
        let code = common::create_link(&app.server, &format!("https://example.com/{i}")).await;
        codes.insert(code);
    }

    assert_eq!(codes.len(), 25);
}

#[tokio::test]
async fn test_get_url_round_trip() {
    let app = common::test_app();
    let code = common::create_link(&app.server, "https://example.com/page").await;

    let response = app.server.get(&format!("/api/v1/urls/{code}")).await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["id"], 1);
    assert_eq!(body["short_code"], code);
    assert_eq!(body["original_url"], "https://example.com/page");
    assert_eq!(body["clicks"], 0);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_get_url_not_found() {
    let app = common::test_app();

    let response = app.server.get("/api/v1/urls/nope00").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "URL not found");
}
