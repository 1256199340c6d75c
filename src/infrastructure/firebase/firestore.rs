use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    entities::report::ReportRecord,
    errors::StoreError,
    repositories::report::ReportRepository,
};

use super::{check_status, FirebaseClient};

#[derive(Clone)]
pub struct FirestoreReportRepo {
    pub client: FirebaseClient,
}

impl FirestoreReportRepo {
    pub fn new(client: FirebaseClient) -> Self {
        FirestoreReportRepo { client }
    }
}

#[derive(Deserialize)]
struct CreatedDocument {
    name: String,
}

#[async_trait]
impl ReportRepository for FirestoreReportRepo {
    async fn insert_report(&self, collection: &str, record: &ReportRecord) -> Result<String, StoreError> {
        let response = self.client.http
            .post(self.client.documents_url(collection))
            .query(&[("key", self.client.api_key.as_str())])
            .json(&json!({ "fields": to_firestore_fields(record) }))
            .send()
            .await?;

        let created: CreatedDocument = check_status(response).await?.json().await?;

        document_id(&created.name)
            .map(str::to_string)
            .ok_or_else(|| StoreError::MalformedResponse(format!("unexpected document name '{}'", created.name)))
    }

    async fn ping(&self, collection: &str) -> Result<(), StoreError> {
        let response = self.client.http
            .get(self.client.documents_url(collection))
            .query(&[("key", self.client.api_key.as_str()), ("pageSize", "1")])
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }
}

/// Encodes a report as a Firestore `fields` map.
pub fn to_firestore_fields(record: &ReportRecord) -> Value {
    json!({
        "name": string_value(&record.name),
        "age": { "integerValue": record.age.to_string() },
        "gender": string_value(record.gender.as_str()),
        "lastSeenLocation": string_value(&record.last_seen_location),
        "dateLastSeen": timestamp_value(&record.date_last_seen),
        "contactInfo": string_value(&record.contact_info),
        "description": string_value(&record.description),
        "imageUrl": string_value(&record.image_url),
        "createdAt": timestamp_value(&record.created_at),
    })
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn timestamp_value(value: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339_opts(SecondsFormat::Millis, true) })
}

/// `projects/p/databases/(default)/documents/missingPersons/abc` → `abc`
pub fn document_id(resource_name: &str) -> Option<&str> {
    resource_name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && resource_name.contains("/documents/"))
}
