use chrono::{DateTime, Utc};

use crate::{
    entities::{
        report::{Gender, ImageAttachment, ReportCandidate},
        submission::{RawField, RawImage, RawSubmission},
    },
    errors::FieldError,
    utils::{
        dates::{from_epoch_millis, parse_date_input},
        image::{decode_base64_image, resolve_content_type, ImageDecodeError},
    },
};

const EXPECTED_TEXT: &str = "Expected text.";
const AGE_NOT_WHOLE: &str = "Age must be a whole number.";
const DATE_INVALID: &str = "Date last seen must be a valid date.";
const GENDER_INVALID: &str = "Gender must be one of Male, Female or Other.";
const IMAGE_MALFORMED: &str = "Image must include a file name and base64 data.";

/// Output of normalization: a typed candidate plus every coercion failure.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSubmission {
    pub candidate: ReportCandidate,
    pub errors: Vec<FieldError>,
}

/// Coerces a raw submission into the shape the validator checks.
///
/// Never fails: a value that cannot be coerced is left empty on the candidate
/// and recorded as a field error instead.
pub fn normalize(raw: RawSubmission) -> NormalizedSubmission {
    let mut errors = Vec::new();

    let candidate = ReportCandidate {
        name: coerce_text(raw.name, "name", &mut errors),
        age: coerce_age(raw.age, &mut errors),
        gender: coerce_gender(raw.gender, &mut errors),
        last_seen_location: coerce_text(raw.last_seen_location, "lastSeenLocation", &mut errors),
        date_last_seen: coerce_date(raw.date_last_seen, &mut errors),
        contact_info: coerce_text(raw.contact_info, "contactInfo", &mut errors),
        description: coerce_text(raw.description, "description", &mut errors),
        image: coerce_image(raw.image, &mut errors),
    };

    NormalizedSubmission { candidate, errors }
}

fn coerce_text(field: Option<RawField>, name: &str, errors: &mut Vec<FieldError>) -> String {
    match field {
        None | Some(RawField::Other(serde_json::Value::Null)) => String::new(),
        Some(RawField::Text(s)) => s,
        Some(_) => {
            errors.push(FieldError::new(name, EXPECTED_TEXT));
            String::new()
        }
    }
}

fn coerce_age(field: Option<RawField>, errors: &mut Vec<FieldError>) -> Option<i64> {
    let parsed = match field? {
        RawField::Text(s) if s.trim().is_empty() => return None,
        RawField::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        RawField::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        RawField::Other(serde_json::Value::Null) => return None,
        RawField::Other(_) => None,
    };

    if parsed.is_none() {
        errors.push(FieldError::new("age", AGE_NOT_WHOLE));
    }
    parsed
}

fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn coerce_gender(field: Option<RawField>, errors: &mut Vec<FieldError>) -> Option<Gender> {
    match field? {
        RawField::Text(s) if s.is_empty() => None,
        RawField::Other(serde_json::Value::Null) => None,
        RawField::Text(s) => match s.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(()) => {
                errors.push(FieldError::new("gender", GENDER_INVALID));
                None
            }
        },
        _ => {
            errors.push(FieldError::new("gender", GENDER_INVALID));
            None
        }
    }
}

fn coerce_date(field: Option<RawField>, errors: &mut Vec<FieldError>) -> Option<DateTime<Utc>> {
    let parsed = match field? {
        RawField::Text(s) if s.trim().is_empty() => return None,
        RawField::Text(s) => parse_date_input(&s),
        RawField::Number(n) => n.as_i64().and_then(from_epoch_millis),
        RawField::Other(serde_json::Value::Null) => return None,
        RawField::Other(_) => None,
    };

    if parsed.is_none() {
        errors.push(FieldError::new("dateLastSeen", DATE_INVALID));
    }
    parsed
}

fn coerce_image(image: Option<RawImage>, errors: &mut Vec<FieldError>) -> Option<ImageAttachment> {
    let (file_name, declared, bytes) = match image? {
        RawImage::Binary { file_name, content_type, data } => {
            (file_name.unwrap_or_default(), content_type, data)
        }
        RawImage::Encoded(encoded) => match decode_base64_image(&encoded.data) {
            Ok(decoded) => (
                encoded.name,
                encoded.content_type.or(decoded.declared_type),
                decoded.bytes,
            ),
            Err(ImageDecodeError::Empty) => return None,
            Err(e) => {
                errors.push(FieldError::new("image", e.to_string()));
                return None;
            }
        },
        RawImage::Malformed(_) => {
            errors.push(FieldError::new("image", IMAGE_MALFORMED));
            return None;
        }
    };

    // An untouched file input still sends an empty part.
    if bytes.is_empty() {
        return None;
    }

    let content_type = resolve_content_type(&bytes, declared.as_deref(), &file_name);

    Some(ImageAttachment {
        file_name,
        content_type,
        bytes,
    })
}
