use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    errors::GuidanceError,
    firebase::google_error_message,
    repositories::guidance::GuidanceService,
    settings::AppConfig,
};

/// Gemini `generateContent` client constrained to a `{ "guidance": string }` JSON reply.
#[derive(Clone)]
pub struct GeminiGuidanceService {
    http: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiGuidanceService {
    pub fn new(config: &AppConfig, http: Client) -> Self {
        GeminiGuidanceService {
            http,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GuidanceService for GeminiGuidanceService {
    async fn generate(&self, prompt: &str) -> Result<String, GuidanceError> {
        let api_key = self.api_key.as_deref().ok_or(GuidanceError::NotConfigured)?;

        let response = self.http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&generate_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GuidanceError::Rejected {
                status: status.as_u16(),
                message: google_error_message(&body),
            });
        }

        let body: Value = response.json().await?;
        parse_generate_response(&body)
    }
}

pub fn generate_request(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": prompt }] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "guidance": {
                        "type": "STRING",
                        "description": "Advice on writing an effective description of the missing person."
                    }
                },
                "required": ["guidance"]
            }
        }
    })
}

#[derive(Deserialize)]
struct GuidancePayload {
    guidance: String,
}

/// Pulls `guidance` out of the first candidate of a `generateContent` reply.
pub fn parse_generate_response(body: &Value) -> Result<String, GuidanceError> {
    let text: String = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .filter(|t: &String| !t.trim().is_empty())
        .ok_or_else(|| GuidanceError::MalformedResponse("response has no candidate text".into()))?;

    let payload: GuidancePayload = serde_json::from_str(text.trim())
        .map_err(|e| GuidanceError::MalformedResponse(format!("candidate is not guidance JSON: {}", e)))?;

    Ok(payload.guidance)
}
