use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use serde::Deserialize;

// ───── Canonical raw input ──────────────────────────────────────────

/// A scalar exactly as the client sent it, before any coercion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl RawField {
    pub fn text(value: impl Into<String>) -> Self {
        RawField::Text(value.into())
    }

    /// Human readable form, `None` for blank values.
    pub fn display(&self) -> Option<String> {
        let shown = match self {
            RawField::Text(s) => s.clone(),
            RawField::Number(n) => n.to_string(),
            RawField::Other(serde_json::Value::Null) => return None,
            RawField::Other(v) => v.to_string(),
        };
        if shown.is_empty() { None } else { Some(shown) }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

impl From<i64> for RawField {
    fn from(value: i64) -> Self {
        RawField::Number(value.into())
    }
}

/// Photo as it arrived: raw bytes from a multipart part, or a base64 payload
/// embedded in a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub enum RawImage {
    Binary {
        file_name: Option<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    },
    Encoded(EncodedImage),
    /// JSON `image` value that is not an `{ name, data }` object.
    Malformed(serde_json::Value),
}

impl From<serde_json::Value> for RawImage {
    fn from(value: serde_json::Value) -> Self {
        match serde_json::from_value::<EncodedImage>(value.clone()) {
            Ok(encoded) => RawImage::Encoded(encoded),
            Err(_) => RawImage::Malformed(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub name: String,
    /// Base64 payload, optionally prefixed with `data:<mime>;base64,`.
    pub data: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// The single shape every entry point is reduced to before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubmission {
    pub name: Option<RawField>,
    pub age: Option<RawField>,
    pub gender: Option<RawField>,
    pub last_seen_location: Option<RawField>,
    pub date_last_seen: Option<RawField>,
    pub contact_info: Option<RawField>,
    pub description: Option<RawField>,
    pub image: Option<RawImage>,
}

// ───── JSON body ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSubmission {
    pub name: Option<RawField>,
    pub age: Option<RawField>,
    pub gender: Option<RawField>,
    pub last_seen_location: Option<RawField>,
    pub date_last_seen: Option<RawField>,
    pub contact_info: Option<RawField>,
    pub description: Option<RawField>,
    /// Kept loose so a badly shaped photo is a field error, not a 400.
    #[serde(default)]
    pub image: serde_json::Value,
}

impl From<JsonSubmission> for RawSubmission {
    fn from(body: JsonSubmission) -> Self {
        RawSubmission {
            name: body.name,
            age: body.age,
            gender: body.gender,
            last_seen_location: body.last_seen_location,
            date_last_seen: body.date_last_seen,
            contact_info: body.contact_info,
            description: body.description,
            image: match body.image {
                serde_json::Value::Null => None,
                value => Some(RawImage::from(value)),
            },
        }
    }
}

// ───── Multipart body ───────────────────────────────────────────────

#[derive(Debug, MultipartForm)]
pub struct ReportUpload {
    pub name: Option<Text<String>>,
    pub age: Option<Text<String>>,
    pub gender: Option<Text<String>>,

    #[multipart(rename = "lastSeenLocation")]
    pub last_seen_location: Option<Text<String>>,

    #[multipart(rename = "dateLastSeen")]
    pub date_last_seen: Option<Text<String>>,

    #[multipart(rename = "contactInfo")]
    pub contact_info: Option<Text<String>>,

    pub description: Option<Text<String>>,

    #[multipart(limit = "10MB")]
    pub image: Option<Bytes>,
}

impl From<ReportUpload> for RawSubmission {
    fn from(form: ReportUpload) -> Self {
        let text = |field: Option<Text<String>>| field.map(|t| RawField::Text(t.into_inner()));

        RawSubmission {
            name: text(form.name),
            age: text(form.age),
            gender: text(form.gender),
            last_seen_location: text(form.last_seen_location),
            date_last_seen: text(form.date_last_seen),
            contact_info: text(form.contact_info),
            description: text(form.description),
            image: form.image.map(|part| RawImage::Binary {
                file_name: part.file_name,
                content_type: part.content_type.map(|m| m.essence_str().to_string()),
                data: part.data.to_vec(),
            }),
        }
    }
}
