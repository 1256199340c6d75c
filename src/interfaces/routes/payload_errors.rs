use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::JsonPayloadError,
};
use serde_json::json;

use crate::constants::MAX_BODY_BYTES;

/// Body limits and JSON error bodies for the JSON and multipart extractors.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| PayloadError::from(err).into())
    );

    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_BODY_BYTES)
            .memory_limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| PayloadError::from(err).into())
    );
}

#[derive(Debug)]
pub struct PayloadError {
    message: String,
    status: StatusCode
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for PayloadError {
    fn from(err: JsonPayloadError) -> Self {
        let status = match err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        PayloadError {
            message: format!("JSON payload error: {}", err),
            status,
        }
    }
}

impl From<MultipartError> for PayloadError {
    fn from(err: MultipartError) -> Self {
        let status = match err {
            MultipartError::ContentTypeIncompatible => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => err.status_code(),
        };
        PayloadError {
            message: format!("Multipart payload error: {}", err),
            status,
        }
    }
}
