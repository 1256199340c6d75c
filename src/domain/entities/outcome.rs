use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use serde::Serialize;

use crate::{
    constants::{MSG_SUBMITTED, MSG_UPLOAD_FAILED, MSG_VALIDATION_FAILED},
    errors::FieldError,
};

/// Which step of the pipeline produced the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Accepted,
    Rejected,
    UploadFailed,
    PersistFailed,
}

/// Result of a submission, returned to the caller instead of an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub message: String,
    pub is_error: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, Vec<String>>,

    #[serde(skip)]
    pub kind: OutcomeKind,
}

impl SubmissionOutcome {
    pub fn accepted(report_id: String) -> Self {
        SubmissionOutcome {
            message: MSG_SUBMITTED.to_string(),
            is_error: false,
            report_id: Some(report_id),
            field_errors: BTreeMap::new(),
            kind: OutcomeKind::Accepted,
        }
    }

    pub fn rejected(errors: &[FieldError]) -> Self {
        let mut field_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for e in errors {
            field_errors.entry(e.field.clone()).or_default().push(e.message.clone());
        }

        SubmissionOutcome {
            message: MSG_VALIDATION_FAILED.to_string(),
            is_error: true,
            report_id: None,
            field_errors,
            kind: OutcomeKind::Rejected,
        }
    }

    pub fn upload_failed() -> Self {
        Self::failure(MSG_UPLOAD_FAILED.to_string(), OutcomeKind::UploadFailed)
    }

    pub fn persist_failed(message: String) -> Self {
        Self::failure(message, OutcomeKind::PersistFailed)
    }

    fn failure(message: String, kind: OutcomeKind) -> Self {
        SubmissionOutcome {
            message,
            is_error: true,
            report_id: None,
            field_errors: BTreeMap::new(),
            kind,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            OutcomeKind::Accepted => StatusCode::CREATED,
            OutcomeKind::Rejected => StatusCode::BAD_REQUEST,
            OutcomeKind::UploadFailed | OutcomeKind::PersistFailed => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Either generated advice or an error marker, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GuidanceOutcome {
    Guidance { guidance: String },
    Failure {
        error: String,
        #[serde(skip)]
        invalid_input: bool,
    },
}

impl GuidanceOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, GuidanceOutcome::Failure { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GuidanceOutcome::Guidance { .. } => StatusCode::OK,
            GuidanceOutcome::Failure { invalid_input: true, .. } => StatusCode::BAD_REQUEST,
            GuidanceOutcome::Failure { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}
