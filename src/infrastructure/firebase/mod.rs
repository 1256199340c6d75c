//! Firebase backends (Firestore documents and Cloud Storage objects) over
//! their public REST APIs.

pub mod firestore;
pub mod storage;

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{errors::StoreError, settings::AppConfig};

/// Connection details shared by the Firestore and Storage clients.
#[derive(Clone)]
pub struct FirebaseClient {
    pub http: Client,
    pub project_id: String,
    pub api_key: String,
    pub database: String,
    pub bucket: String,
    pub firestore_base_url: String,
    pub storage_base_url: String,
}

impl FirebaseClient {
    pub fn new(config: &AppConfig, http: Client) -> Self {
        FirebaseClient {
            http,
            project_id: config.firebase_project_id.clone(),
            api_key: config.firebase_api_key.clone(),
            database: config.firestore_database.clone(),
            bucket: config.firebase_storage_bucket.clone(),
            firestore_base_url: config.firestore_base_url.trim_end_matches('/').to_string(),
            storage_base_url: config.storage_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.firestore_base_url, self.project_id, self.database, collection
        )
    }

    pub fn objects_url(&self) -> String {
        format!("{}/b/{}/o", self.storage_base_url, self.bucket)
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.objects_url(), urlencoding::encode(key))
    }
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
}

/// Passes successful responses through and turns the rest into `StoreError::Rejected`.
pub(crate) async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message: google_error_message(&body),
    })
}

/// Extracts `error.message` from a Google API error body, falling back to the raw text.
pub fn google_error_message(body: &str) -> String {
    serde_json::from_str::<GoogleErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
