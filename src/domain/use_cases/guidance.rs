use crate::{
    constants::{DETAILS_PLACEHOLDER, MSG_GUIDANCE_FAILED, MSG_GUIDANCE_INVALID},
    entities::{
        outcome::GuidanceOutcome,
        submission::{RawField, RawSubmission},
    },
    repositories::guidance::GuidanceService,
};

const DETAILS_SLOT: &str = "{{missingPersonDetails}}";

pub const GUIDANCE_TEMPLATE: &str = "You are an AI assistant that provides guidance on writing effective descriptions of missing persons for community reports.

Based on the following details of the missing person:
{{missingPersonDetails}}

Provide advice on how to write a clear, concise, and helpful description to aid volunteers in the search. Focus on including specific details that can help identify the person and their last known whereabouts.";

pub struct GuidanceHandler<G>
where
    G: GuidanceService,
{
    pub guidance_service: G,
}

impl<G> GuidanceHandler<G>
where
    G: GuidanceService,
{
    pub fn new(guidance_service: G) -> Self {
        GuidanceHandler { guidance_service }
    }

    /// Accepts `{ "details": <string> }`; anything else is rejected before
    /// the collaborator is called. One call, no retries.
    pub async fn request(&self, body: &serde_json::Value) -> GuidanceOutcome {
        let Some(details) = body.get("details").and_then(|d| d.as_str()) else {
            return GuidanceOutcome::Failure {
                error: MSG_GUIDANCE_INVALID.to_string(),
                invalid_input: true,
            };
        };

        match self.guidance_service.generate(&render_prompt(details)).await {
            Ok(guidance) => GuidanceOutcome::Guidance { guidance },
            Err(e) => {
                tracing::error!("Guidance generation failed: {}", e);
                GuidanceOutcome::Failure {
                    error: MSG_GUIDANCE_FAILED.to_string(),
                    invalid_input: false,
                }
            }
        }
    }
}

pub fn render_prompt(details: &str) -> String {
    GUIDANCE_TEMPLATE.replace(DETAILS_SLOT, details)
}

/// Summary of a draft report, with `N/A` for every field not filled in yet.
pub fn compose_details(draft: &RawSubmission) -> String {
    let shown = |field: &Option<RawField>| {
        field
            .as_ref()
            .and_then(RawField::display)
            .unwrap_or_else(|| DETAILS_PLACEHOLDER.to_string())
    };
    let description = draft
        .description
        .as_ref()
        .and_then(RawField::display)
        .unwrap_or_default();

    format!(
        "Name: {}, Age: {}, Gender: {}, Last Seen Location: {}. Current description draft: \"{}\"",
        shown(&draft.name),
        shown(&draft.age),
        shown(&draft.gender),
        shown(&draft.last_seen_location),
        description,
    )
}
