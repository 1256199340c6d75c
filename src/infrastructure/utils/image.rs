use std::path::Path;

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::{DateTime, Utc};
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Standard alphabet, padding optional. Browsers and most SDKs pad, some
/// mobile clients strip it.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_FILE_NAME_CHARS: usize = 100;

static UNSAFE_KEY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex is valid"));

#[derive(Debug, Display, PartialEq)]
pub enum ImageDecodeError {
    #[display("Image data is empty.")]
    Empty,

    #[display("Image data is not valid base64.")]
    InvalidBase64,
}

/// Decoded payload plus the media type announced by a `data:` URL prefix.
#[derive(Debug, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub declared_type: Option<String>,
}

/// Decodes a base64 image payload, with or without a `data:<mime>;base64,` prefix.
pub fn decode_base64_image(payload: &str) -> Result<DecodedImage, ImageDecodeError> {
    let payload = payload.trim();

    let (declared_type, encoded) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest.split_once(',').ok_or(ImageDecodeError::InvalidBase64)?;
            let mime = meta.strip_suffix(";base64").ok_or(ImageDecodeError::InvalidBase64)?;
            let mime = normalize_media_type(mime);
            (if mime.is_empty() { None } else { Some(mime) }, data)
        }
        None => (None, payload),
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|_| ImageDecodeError::InvalidBase64)?;

    Ok(DecodedImage { bytes, declared_type })
}

/// Picks the media type of an uploaded image.
///
/// Magic bytes win over anything the client declared; the declared type is
/// used when the bytes are not recognized, then the file extension.
pub fn resolve_content_type(bytes: &[u8], declared: Option<&str>, file_name: &str) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    if let Some(declared) = declared.map(normalize_media_type).filter(|d| !d.is_empty()) {
        return declared;
    }

    content_type_from_extension(file_name)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

fn content_type_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())?;

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// `Image/PNG; charset=binary` → `image/png`
fn normalize_media_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Strips directories and characters that are awkward in object names.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned = UNSAFE_KEY_CHARS.replace_all(base, "_");
    let cleaned: String = cleaned
        .trim_matches(|c| c == '.' || c == '_')
        .chars()
        .take(MAX_FILE_NAME_CHARS)
        .collect();

    if cleaned.is_empty() { "image".to_string() } else { cleaned }
}

/// Timestamp-namespaced object key: `<prefix>/<millis>-<nonce>-<file name>`.
pub fn storage_key(prefix: &str, file_name: &str, now: DateTime<Utc>) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    let name = sanitize_file_name(file_name);
    let prefix = prefix.trim_matches('/');

    if prefix.is_empty() {
        format!("{}-{}-{}", now.timestamp_millis(), &nonce[..8], name)
    } else {
        format!("{}/{}-{}-{}", prefix, now.timestamp_millis(), &nonce[..8], name)
    }
}
