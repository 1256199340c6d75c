use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    constants::{
        MAX_AGE, MIN_AGE, MIN_CONTACT_LENGTH, MIN_DESCRIPTION_LENGTH, MIN_LOCATION_LENGTH,
        MIN_NAME_LENGTH,
    },
    errors::FieldError,
};

// ───── Enumerations ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const AGE_REQUIRED: &str = "Age is required.";
const GENDER_REQUIRED: &str = "Gender is required.";
const DATE_REQUIRED: &str = "A date is required.";

// ───── Validation Models ────────────────────────────────────────────

/// Photo attached to a report, already decoded and typed.
#[derive(Clone, PartialEq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Report after type coercion but before any constraint has been checked.
/// Image rules live in `use_cases::validation` because they can yield more
/// than one message for the same field. Presence of the typed fields is
/// checked by `MissingPersonReport::try_from`.
#[derive(Debug, Clone, Default, Validate)]
pub struct ReportCandidate {
    #[validate(length(min = MIN_NAME_LENGTH, message = "Name must be at least 2 characters."))]
    pub name: String,

    #[validate(
        range(min = MIN_AGE, message = "Age must be a positive number."),
        custom(function = "validate_max_age")
    )]
    pub age: Option<i64>,

    pub gender: Option<Gender>,

    #[validate(length(min = MIN_LOCATION_LENGTH, message = "Please provide a more detailed location."))]
    pub last_seen_location: String,

    pub date_last_seen: Option<DateTime<Utc>>,

    #[validate(length(min = MIN_CONTACT_LENGTH, message = "Contact information is required."))]
    pub contact_info: String,

    #[validate(length(min = MIN_DESCRIPTION_LENGTH, message = "Description must be at least 10 characters long."))]
    pub description: String,

    pub image: Option<ImageAttachment>,
}

fn validate_max_age(age: i64) -> Result<(), ValidationError> {
    if age > MAX_AGE {
        let mut err = ValidationError::new("age_too_high");
        err.message = Some("Age must be 150 or less.".into());
        return Err(err);
    }
    Ok(())
}

// ───── Domain Models ────────────────────────────────────────────────

/// A report that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingPersonReport {
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub last_seen_location: String,
    pub date_last_seen: DateTime<Utc>,
    pub contact_info: String,
    pub description: String,
    pub image: Option<ImageAttachment>,
}

impl TryFrom<ReportCandidate> for MissingPersonReport {
    type Error = Vec<FieldError>;

    /// Fails with one "required" error per missing typed field.
    fn try_from(candidate: ReportCandidate) -> Result<Self, Self::Error> {
        match (candidate.age, candidate.gender, candidate.date_last_seen) {
            (Some(age), Some(gender), Some(date_last_seen)) => Ok(MissingPersonReport {
                name: candidate.name,
                age,
                gender,
                last_seen_location: candidate.last_seen_location,
                date_last_seen,
                contact_info: candidate.contact_info,
                description: candidate.description,
                image: candidate.image,
            }),
            (age, gender, date_last_seen) => {
                let mut missing = Vec::new();
                if age.is_none() {
                    missing.push(FieldError::new("age", AGE_REQUIRED));
                }
                if gender.is_none() {
                    missing.push(FieldError::new("gender", GENDER_REQUIRED));
                }
                if date_last_seen.is_none() {
                    missing.push(FieldError::new("dateLastSeen", DATE_REQUIRED));
                }
                Err(missing)
            }
        }
    }
}

/// Document written to the reports collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub last_seen_location: String,
    pub date_last_seen: DateTime<Utc>,
    pub contact_info: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl MissingPersonReport {
    /// Builds the persisted document. The photo itself is not part of it,
    /// only the URL it was uploaded to.
    pub fn into_record(self, image_url: String, created_at: DateTime<Utc>) -> ReportRecord {
        ReportRecord {
            name: self.name,
            age: self.age,
            gender: self.gender,
            last_seen_location: self.last_seen_location,
            date_last_seen: self.date_last_seen,
            contact_info: self.contact_info,
            description: self.description,
            image_url,
            created_at,
        }
    }
}

impl ReportRecord {
    /// Fixed record used to smoke-test store connectivity.
    pub fn dummy(now: DateTime<Utc>) -> Self {
        ReportRecord {
            name: "Jane Doe (Test)".to_string(),
            age: 30,
            gender: Gender::Female,
            last_seen_location: "Test Park, Main Street".to_string(),
            date_last_seen: now,
            contact_info: "555-123-4567".to_string(),
            description: "This is a test report submitted automatically to verify functionality. \
                          She was last seen wearing a blue jacket and jeans."
                .to_string(),
            image_url: String::new(),
            created_at: now,
        }
    }
}
