use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder};

use crate::{
    entities::{
        outcome::SubmissionOutcome,
        submission::{JsonSubmission, ReportUpload},
    },
    errors::AppError,
    AppState,
};

/// Accepts a report as JSON, with the photo as base64.
pub async fn submit_report_json(
    state: web::Data<AppState>,
    body: web::Json<JsonSubmission>,
) -> impl Responder {
    let outcome = state.submission_handler.submit(body.into_inner().into()).await;
    outcome_response(&outcome)
}

/// Accepts a report as `multipart/form-data`, with the photo as a file part.
pub async fn submit_report_form(
    state: web::Data<AppState>,
    form: MultipartForm<ReportUpload>,
) -> impl Responder {
    let outcome = state.submission_handler.submit(form.into_inner().into()).await;
    outcome_response(&outcome)
}

/// Any other content type.
pub async fn unsupported_report_payload(req: HttpRequest) -> impl Responder {
    tracing::warn!(content_type = %req.content_type(), "Rejected report payload");
    AppError::UnsupportedMediaType(
        "Request must be either application/json or multipart/form-data".to_string()
    )
    .to_http_response()
}

/// Stores the fixed test record to check store connectivity.
pub async fn submit_test_report(state: web::Data<AppState>) -> impl Responder {
    let outcome = state.submission_handler.submit_dummy().await;
    outcome_response(&outcome)
}

fn outcome_response(outcome: &SubmissionOutcome) -> HttpResponse {
    HttpResponse::build(outcome.status_code()).json(outcome)
}
