use chrono::{TimeZone, Utc};
use safelink_backend::{
    ai::gemini::{generate_request, parse_generate_response},
    entities::report::{Gender, ReportRecord},
    errors::{GuidanceError, StoreError},
    firebase::{
        firestore::{document_id, to_firestore_fields},
        google_error_message,
        storage::FirebaseBlobStore,
        FirebaseClient,
    },
    settings::AppConfig,
    utils::image::{sanitize_file_name, storage_key},
};
use serde_json::json;

fn record() -> ReportRecord {
    let seen = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
    ReportRecord {
        name: "John Smith".to_string(),
        age: 42,
        gender: Gender::Other,
        last_seen_location: "Central Station".to_string(),
        date_last_seen: seen,
        contact_info: "555-987-6543".to_string(),
        description: "Green raincoat".to_string(),
        image_url: String::new(),
        created_at: seen,
    }
}

fn firebase_client() -> FirebaseClient {
    let config = AppConfig {
        firebase_project_id: "safelink-test".to_string(),
        firebase_api_key: "key".to_string(),
        firebase_storage_bucket: "safelink-test.appspot.com".to_string(),
        ..Default::default()
    };
    FirebaseClient::new(&config, reqwest::Client::new())
}

#[test]
fn firestore_fields_use_typed_values() {
    let fields = to_firestore_fields(&record());

    assert_eq!(fields["name"], json!({ "stringValue": "John Smith" }));
    assert_eq!(fields["age"], json!({ "integerValue": "42" }));
    assert_eq!(fields["gender"], json!({ "stringValue": "Other" }));
    assert_eq!(fields["dateLastSeen"], json!({ "timestampValue": "2024-03-01T18:30:00.000Z" }));
    assert_eq!(fields["imageUrl"], json!({ "stringValue": "" }));
    assert!(fields.get("createdAt").is_some());
}

#[test]
fn document_id_is_last_path_segment() {
    assert_eq!(
        document_id("projects/p/databases/(default)/documents/missingPersons/abc123"),
        Some("abc123")
    );
    assert_eq!(document_id("missingPersons/abc123"), None);
    assert_eq!(document_id("projects/p/databases/(default)/documents/missingPersons/"), None);
}

#[test]
fn google_error_message_prefers_structured_message() {
    let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
    assert_eq!(google_error_message(body), "Missing or insufficient permissions.");
    assert_eq!(google_error_message("  Bad Gateway \n"), "Bad Gateway");
}

#[test]
fn store_error_detail_hides_empty_messages() {
    assert_eq!(StoreError::Unavailable.detail(), None);
    assert_eq!(
        StoreError::Rejected { status: 500, message: " ".into() }.detail(),
        None
    );
    assert_eq!(
        StoreError::Rejected { status: 403, message: "denied".into() }.detail().as_deref(),
        Some("denied")
    );
}

#[test]
fn firebase_urls() {
    let client = firebase_client();

    assert_eq!(
        client.documents_url("missingPersons"),
        "https://firestore.googleapis.com/v1/projects/safelink-test/databases/(default)/documents/missingPersons"
    );
    assert_eq!(
        client.object_url("missing-persons/1-ab-face.png"),
        "https://firebasestorage.googleapis.com/v0/b/safelink-test.appspot.com/o/missing-persons%2F1-ab-face.png"
    );

    let store = FirebaseBlobStore::new(client);
    assert!(store
        .download_url("a/b.png", Some("tok1,tok2"))
        .ends_with("/o/a%2Fb.png?alt=media&token=tok1"));
    assert!(store.download_url("a/b.png", None).ends_with("?alt=media"));
}

#[test]
fn storage_keys_are_namespaced_and_sanitized() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let key = storage_key("missing-persons/", "../My Photo (1).JPG", now);

    assert!(key.starts_with("missing-persons/1709251200000-"));
    assert!(key.ends_with("-My_Photo_1_.JPG"));
    assert_ne!(key, storage_key("missing-persons", "../My Photo (1).JPG", now));

    assert_eq!(sanitize_file_name(""), "image");
    assert_eq!(sanitize_file_name("C:\\Users\\me\\face.png"), "face.png");
}

#[test]
fn generate_request_embeds_prompt_and_schema() {
    let request = generate_request("help me");

    assert_eq!(request["contents"][0]["parts"][0]["text"], "help me");
    assert_eq!(request["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(request["generationConfig"]["responseSchema"]["required"][0], "guidance");
}

#[test]
fn generate_response_yields_guidance_text() {
    let body = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": "{\"guidance\": \"Describe the coat.\"}" }]
            }
        }]
    });

    assert_eq!(parse_generate_response(&body).unwrap(), "Describe the coat.");
}

#[test]
fn generate_response_without_guidance_is_malformed() {
    let empty = json!({ "candidates": [] });
    assert!(matches!(parse_generate_response(&empty), Err(GuidanceError::MalformedResponse(_))));

    let wrong_shape = json!({
        "candidates": [{ "content": { "parts": [{ "text": "{\"advice\": \"x\"}" }] } }]
    });
    assert!(matches!(parse_generate_response(&wrong_shape), Err(GuidanceError::MalformedResponse(_))));
}
