use validator::Validate;

use crate::{
    constants::{ACCEPTED_IMAGE_TYPES, MAX_IMAGE_BYTES},
    entities::report::{ImageAttachment, MissingPersonReport},
    errors::{field_errors_from, FieldError},
    use_cases::normalizer::NormalizedSubmission,
};

const IMAGE_TOO_LARGE: &str = "Max image size is 4MB.";
const IMAGE_UNSUPPORTED: &str = "Only .jpg, .jpeg, .png and .webp formats are supported.";

/// Wire field names in the order errors are reported.
pub const FIELD_ORDER: [&str; 8] = [
    "name",
    "age",
    "gender",
    "lastSeenLocation",
    "dateLastSeen",
    "contactInfo",
    "description",
    "image",
];

/// Checks every field of a normalized submission.
///
/// Returns the typed report, or every violated rule in `FIELD_ORDER`. A field
/// that already failed coercion keeps only its coercion message.
pub fn validate_report(normalized: NormalizedSubmission) -> Result<MissingPersonReport, Vec<FieldError>> {
    let NormalizedSubmission { candidate, errors: coercion_errors } = normalized;
    let coerced = |field: &str| coercion_errors.iter().any(|c| c.field == field);

    let mut rule_errors = match candidate.validate() {
        Ok(()) => Vec::new(),
        Err(validation) => field_errors_from(&validation),
    };
    if let Some(image) = &candidate.image {
        rule_errors.extend(check_image(image));
    }

    let report = MissingPersonReport::try_from(candidate);
    if let Err(missing) = &report {
        rule_errors.extend(missing.iter().cloned());
    }
    rule_errors.retain(|e| !coerced(&e.field));

    let mut errors = coercion_errors.clone();
    errors.extend(rule_errors);

    match report {
        Ok(report) if errors.is_empty() => Ok(report),
        _ => {
            errors.sort_by_key(|e| field_rank(&e.field));
            Err(errors)
        }
    }
}

/// Size and media-type rules; both can fail at once.
pub fn check_image(image: &ImageAttachment) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if image.size() > MAX_IMAGE_BYTES {
        errors.push(FieldError::new("image", IMAGE_TOO_LARGE));
    }
    if !ACCEPTED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
        errors.push(FieldError::new("image", IMAGE_UNSUPPORTED));
    }

    errors
}

fn field_rank(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}
