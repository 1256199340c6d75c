mod test_utils;
mod test_report;

use chrono::{TimeZone, Utc};
use reqwest::{multipart::Part, StatusCode};
use safelink_backend::entities::report::Gender;
use serde_json::{json, Value};
use test_report::*;
use test_utils::*;

#[actix_rt::test]
async fn json_report_is_stored_and_returns_201() {
    let app = TestApp::spawn().await;

    let response = app.post_report_json(&valid_report_json()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Report submitted successfully!");
    assert_eq!(body["isError"], false);
    assert!(body.get("fieldErrors").is_none());

    let stored = app.stored_reports();
    assert_eq!(stored.len(), 1);
    let (id, record) = &stored[0];
    assert_eq!(body["reportId"], id.as_str());
    assert_eq!(record.name, "John Smith");
    assert_eq!(record.age, 42);
    assert_eq!(record.gender, Gender::Male);
    assert_eq!(record.date_last_seen, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    assert_eq!(record.image_url, "");
}

#[actix_rt::test]
async fn multipart_report_with_photo_uploads_then_stores() {
    let app = TestApp::spawn().await;

    let image = Part::bytes(PNG_BYTES.to_vec())
        .file_name("holiday photo.png")
        .mime_str("image/png")
        .unwrap();
    let response = app.post_report_form(valid_form().part("image", image)).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(app.blobs.len(), 1);
    let stored = app.stored_reports();
    let record = &stored[0].1;
    assert!(record.image_url.starts_with("memory://missing-persons/"));
    assert!(record.image_url.ends_with("-holiday_photo.png"));

    let key = record.image_url.trim_start_matches("memory://");
    let object = app.blobs.get(key).expect("uploaded object");
    assert_eq!(object.content_type, "image/png");
    assert_eq!(object.bytes, PNG_BYTES.to_vec());
    assert_eq!(record.date_last_seen, Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap());
}

#[actix_rt::test]
async fn json_report_with_base64_photo_is_uploaded() {
    let app = TestApp::spawn().await;

    let mut body = valid_report_json();
    body["image"] = json!({
        "name": "face.png",
        "data": format!("data:image/png;base64,{}", png_base64())
    });

    let response = app.post_report_json(&body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.blobs.len(), 1);
    assert!(app.stored_reports()[0].1.image_url.ends_with("-face.png"));
}

#[actix_rt::test]
async fn empty_file_part_counts_as_no_photo() {
    let app = TestApp::spawn().await;

    let empty = Part::bytes(Vec::new()).file_name("").mime_str("application/octet-stream").unwrap();
    let response = app.post_report_form(valid_form().part("image", empty)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(app.blobs.is_empty());
    assert_eq!(app.stored_reports()[0].1.image_url, "");
}

#[actix_rt::test]
async fn invalid_report_returns_every_field_error_and_writes_nothing() {
    let app = TestApp::spawn().await;

    let response = app.post_report_json(&json!({
        "name": "J",
        "age": 151,
        "gender": "Unknown",
        "lastSeenLocation": "Park",
        "contactInfo": "",
        "description": "short"
    })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isError"], true);
    assert_eq!(body["message"], "Validation failed. Please check the form fields.");
    assert!(body.get("reportId").is_none());

    let errors = &body["fieldErrors"];
    assert_eq!(errors["name"][0], "Name must be at least 2 characters.");
    assert_eq!(errors["age"][0], "Age must be 150 or less.");
    assert_eq!(errors["gender"][0], "Gender must be one of Male, Female or Other.");
    assert_eq!(errors["lastSeenLocation"][0], "Please provide a more detailed location.");
    assert_eq!(errors["dateLastSeen"][0], "A date is required.");
    assert_eq!(errors["contactInfo"][0], "Contact information is required.");
    assert_eq!(errors["description"][0], "Description must be at least 10 characters long.");

    assert!(app.stored_reports().is_empty());
    assert!(app.blobs.is_empty());
}

#[actix_rt::test]
async fn unsupported_photo_type_is_rejected_before_upload() {
    let app = TestApp::spawn().await;

    let gif = Part::bytes(b"GIF89a\x01\x00\x01\x00".to_vec())
        .file_name("anim.gif")
        .mime_str("image/gif")
        .unwrap();
    let response = app.post_report_form(valid_form().part("image", gif)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["fieldErrors"]["image"][0],
        "Only .jpg, .jpeg, .png and .webp formats are supported."
    );
    assert!(app.blobs.is_empty());
}

#[actix_rt::test]
async fn oversized_photo_gets_field_error_not_transport_error() {
    let app = TestApp::spawn().await;

    let mut data = PNG_BYTES.to_vec();
    data.resize(4 * 1024 * 1024 + 1, 0);
    let big = Part::bytes(data).file_name("big.png").mime_str("image/png").unwrap();

    let response = app.post_report_form(valid_form().part("image", big)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fieldErrors"]["image"][0], "Max image size is 4MB.");
}

#[actix_rt::test]
async fn upload_failure_stops_before_the_record_is_written() {
    let app = TestApp::spawn().await;
    app.blobs.set_offline(true);

    let mut body = valid_report_json();
    body["image"] = json!({ "name": "face.png", "data": png_base64() });
    let response = app.post_report_json(&body).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "An error occurred while uploading the image.");
    assert_eq!(body["isError"], true);
    assert!(app.stored_reports().is_empty());
}

#[actix_rt::test]
async fn store_outage_returns_generic_failure_and_removes_uploaded_photo() {
    let app = TestApp::spawn().await;
    app.reports.set_offline(true);

    let image = Part::bytes(JPEG_BYTES.to_vec()).file_name("me.jpg").mime_str("image/jpeg").unwrap();
    let response = app.post_report_form(valid_form().part("image", image)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "An error occurred while submitting the report.");
    assert!(app.blobs.is_empty());
}

#[actix_rt::test]
async fn test_endpoint_stores_dummy_record() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/reports/test"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = app.stored_reports();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].1.name, "Jane Doe (Test)");
    assert_eq!(stored[0].1.age, 30);
}

#[actix_rt::test]
async fn test_endpoint_reports_store_outage() {
    let app = TestApp::spawn().await;
    app.reports.set_offline(true);

    let response = app.client
        .post(app.url("/api/v1/reports/test"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isError"], true);
}

#[actix_rt::test]
async fn malformed_json_returns_400() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/reports"))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("JSON payload error"), "{}", message);
    assert!(message.contains("line 1 column"), "{}", message);
    assert!(!message.contains("ContentTypeIncompatible"), "{}", message);
    assert!(app.stored_reports().is_empty());
}

#[actix_rt::test]
async fn string_json_body_reports_the_type_mismatch() {
    let app = TestApp::spawn().await;

    let response = app.post_report_json(&json!("John Smith, 42, last seen downtown")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("JSON payload error"), "{}", message);
    assert!(message.contains("invalid type"), "{}", message);
}

#[actix_rt::test]
async fn json_with_charset_parameter_is_accepted() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/reports"))
        .header("Content-Type", "application/json; charset=utf-8")
        .body(valid_report_json().to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.stored_reports().len(), 1);
}

#[actix_rt::test]
async fn wrongly_shaped_json_photo_is_a_field_error() {
    let app = TestApp::spawn().await;

    for image in [json!(png_base64()), json!({ "data": png_base64() })] {
        let mut body = valid_report_json();
        body["image"] = image;

        let response = app.post_report_json(&body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["isError"], true);
        assert_eq!(body["message"], "Validation failed. Please check the form fields.");
        assert_eq!(
            body["fieldErrors"]["image"][0],
            "Image must include a file name and base64 data."
        );
        assert!(body["fieldErrors"].get("name").is_none());
    }

    assert!(app.stored_reports().is_empty());
    assert!(app.blobs.is_empty());
}

#[actix_rt::test]
async fn null_json_photo_means_no_photo() {
    let app = TestApp::spawn().await;

    let mut body = valid_report_json();
    body["image"] = Value::Null;
    let response = app.post_report_json(&body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(app.blobs.is_empty());
}

#[actix_rt::test]
async fn unknown_content_type_returns_415() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/reports"))
        .header("Content-Type", "text/plain")
        .body("name=John")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Unsupported media type: Request must be either application/json or multipart/form-data"
    );
    assert!(app.stored_reports().is_empty());
}

#[actix_rt::test]
async fn missing_content_type_returns_415() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/reports"))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[actix_rt::test]
async fn health_reports_store_backend() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["store_backend"], "memory");
    assert_eq!(body["guidance"], "Configured");
}

#[actix_rt::test]
async fn identical_photos_get_distinct_urls() {
    let app = TestApp::spawn().await;

    for _ in 0..2 {
        let image = Part::bytes(PNG_BYTES.to_vec()).file_name("same.png").mime_str("image/png").unwrap();
        let response = app.post_report_form(valid_form().part("image", image)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let stored = app.stored_reports();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].1.image_url, stored[1].1.image_url);
    assert_ne!(stored[0].0, stored[1].0);
    assert_eq!(app.blobs.len(), 2);
}

#[actix_rt::test]
async fn retry_after_store_recovers_writes_exactly_one_record() {
    let app = TestApp::spawn().await;

    app.reports.set_offline(true);
    let failed = app.post_report_json(&valid_report_json()).await;
    assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);

    app.reports.set_offline(false);
    let retried = app.post_report_json(&valid_report_json()).await;
    assert_eq!(retried.status(), StatusCode::CREATED);

    assert_eq!(app.stored_reports().len(), 1);
}
