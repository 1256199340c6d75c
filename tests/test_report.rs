#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};
use safelink_backend::entities::submission::{EncodedImage, RawField, RawImage, RawSubmission};
use serde_json::{json, Value};

/// Smallest byte string `infer` recognises as a PNG.
pub const PNG_BYTES: [u8; 16] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A,
    0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

pub const JPEG_BYTES: [u8; 12] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
];

pub fn valid_report_json() -> Value {
    json!({
        "name": "John Smith",
        "age": 42,
        "gender": "Male",
        "lastSeenLocation": "Central Station, Platform 4",
        "dateLastSeen": "2024-03-01",
        "contactInfo": "555-987-6543",
        "description": "Tall, grey beard, wearing a green raincoat."
    })
}

pub fn valid_raw_submission() -> RawSubmission {
    RawSubmission {
        name: Some("John Smith".into()),
        age: Some(42i64.into()),
        gender: Some("Male".into()),
        last_seen_location: Some("Central Station, Platform 4".into()),
        date_last_seen: Some("2024-03-01".into()),
        contact_info: Some("555-987-6543".into()),
        description: Some("Tall, grey beard, wearing a green raincoat.".into()),
        image: None,
    }
}

pub fn with_png(mut raw: RawSubmission) -> RawSubmission {
    raw.image = Some(RawImage::Binary {
        file_name: Some("photo.png".to_string()),
        content_type: Some("image/png".to_string()),
        data: PNG_BYTES.to_vec(),
    });
    raw
}

pub fn encoded_png(name: &str) -> EncodedImage {
    EncodedImage {
        name: name.to_string(),
        data: STANDARD.encode(PNG_BYTES),
        content_type: None,
    }
}

pub fn png_base64() -> String {
    STANDARD.encode(PNG_BYTES)
}

pub fn text(value: &str) -> Option<RawField> {
    Some(RawField::text(value))
}

pub fn valid_form() -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("name", "John Smith")
        .text("age", "42")
        .text("gender", "Male")
        .text("lastSeenLocation", "Central Station, Platform 4")
        .text("dateLastSeen", "2024-03-01T18:30:00Z")
        .text("contactInfo", "555-987-6543")
        .text("description", "Tall, grey beard, wearing a green raincoat.")
}
