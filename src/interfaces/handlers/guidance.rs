use actix_web::{web, HttpResponse, Responder};

use crate::{
    entities::submission::{JsonSubmission, RawSubmission},
    use_cases::guidance::compose_details,
    AppState,
};

/// `{ "details": "<free text>" }` → `{ "guidance": .. }` or `{ "error": .. }`
pub async fn request_guidance(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let outcome = state.guidance_handler.request(&body).await;
    HttpResponse::build(outcome.status_code()).json(outcome)
}

/// Same as `request_guidance`, but builds the details string from a report draft.
pub async fn request_guidance_for_draft(
    state: web::Data<AppState>,
    draft: web::Json<JsonSubmission>,
) -> impl Responder {
    let draft: RawSubmission = draft.into_inner().into();
    let body = serde_json::json!({ "details": compose_details(&draft) });

    let outcome = state.guidance_handler.request(&body).await;
    HttpResponse::build(outcome.status_code()).json(outcome)
}
