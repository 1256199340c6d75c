use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

// ───── Report constraints ───────────────────────────────────────────
pub const MIN_NAME_LENGTH: u64 = 2;
pub const MIN_LOCATION_LENGTH: u64 = 5;
pub const MIN_CONTACT_LENGTH: u64 = 5;
pub const MIN_DESCRIPTION_LENGTH: u64 = 10;
pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 150;

pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Upper bound for request bodies. Larger than `MAX_IMAGE_BYTES` (plus base64
/// overhead) so oversized photos are rejected by validation, not by the extractor.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// ───── Outcome messages ─────────────────────────────────────────────
pub const MSG_SUBMITTED: &str = "Report submitted successfully!";
pub const MSG_VALIDATION_FAILED: &str = "Validation failed. Please check the form fields.";
pub const MSG_UPLOAD_FAILED: &str = "An error occurred while uploading the image.";
pub const MSG_SUBMIT_FAILED: &str = "An error occurred while submitting the report.";
pub const MSG_GUIDANCE_INVALID: &str = "Invalid input for guidance generation.";
pub const MSG_GUIDANCE_FAILED: &str = "Failed to generate guidance. Please try again.";

pub const DETAILS_PLACEHOLDER: &str = "N/A";
