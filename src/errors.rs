use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

/// HTTP-level failures that happen outside the submission pipeline
/// (unsupported payloads, startup problems).
#[derive(Debug)]
pub enum AppError {
    UnsupportedMediaType(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InternalError(_) => serde_json::json!({"error": "Internal server error"}),
            _ => serde_json::json!({"error": self.to_string()}),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::InternalError(format!("HTTP client error: {}", err))
    }
}

/// Failures raised by the document store or the blob store.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display("store request failed: {_0}")]
    Transport(String),

    #[display("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[display("unexpected store response: {_0}")]
    MalformedResponse(String),

    #[display("store unavailable")]
    Unavailable,
}

impl StoreError {
    /// Message worth showing to the reporter, if the failure carries one.
    pub fn detail(&self) -> Option<String> {
        match self {
            StoreError::Unavailable => None,
            StoreError::Rejected { message, .. } if message.trim().is_empty() => None,
            StoreError::Rejected { message, .. } => Some(message.clone()),
            _ => Some(self.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::MalformedResponse(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Display)]
pub enum GuidanceError {
    #[display("Guidance service is not configured")]
    NotConfigured,

    #[display("Guidance request failed: {_0}")]
    Transport(String),

    #[display("Guidance service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[display("Malformed guidance response: {_0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GuidanceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GuidanceError::MalformedResponse(err.to_string())
        } else {
            GuidanceError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens `validator` output into one `FieldError` per violated rule,
/// keyed by the camelCase wire name of the field.
pub fn field_errors_from(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let wire = to_camel_case(field);
            errors.iter().map(move |e| FieldError {
                field: wire.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect()
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
