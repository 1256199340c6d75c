use chrono::Utc;

use crate::{
    constants::MSG_SUBMIT_FAILED,
    entities::{
        outcome::SubmissionOutcome,
        report::ReportRecord,
        submission::RawSubmission,
    },
    errors::StoreError,
    repositories::{blob::BlobStore, report::ReportRepository},
    use_cases::{normalizer::normalize, validation::validate_report},
    utils::image::storage_key,
};

/// Where submissions are written.
#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    pub collection: String,
    pub image_prefix: String,
}

pub struct SubmissionHandler<R, B>
where
    R: ReportRepository,
    B: BlobStore,
{
    pub report_repo: R,
    pub blob_store: B,
    pub settings: SubmissionSettings,
}

impl<R, B> SubmissionHandler<R, B>
where
    R: ReportRepository,
    B: BlobStore,
{
    pub fn new(report_repo: R, blob_store: B, settings: SubmissionSettings) -> Self {
        SubmissionHandler {
            report_repo,
            blob_store,
            settings,
        }
    }

    /// Normalizes, validates, uploads the photo (if any) and stores the report.
    ///
    /// Every failure is turned into an outcome; nothing is written for an
    /// invalid report and no record is written when the upload fails.
    pub async fn submit(&self, raw: RawSubmission) -> SubmissionOutcome {
        let mut report = match validate_report(normalize(raw)) {
            Ok(report) => report,
            Err(errors) => {
                tracing::warn!(?errors, "Report validation failed");
                return SubmissionOutcome::rejected(&errors);
            }
        };

        let uploaded = match report.image.take() {
            Some(image) => {
                let key = storage_key(&self.settings.image_prefix, &image.file_name, Utc::now());
                let size = image.size();
                match self.blob_store.upload(&key, image.bytes, &image.content_type).await {
                    Ok(blob) => {
                        tracing::info!(key = %blob.key, size, "Uploaded report image");
                        Some(blob)
                    }
                    Err(e) => {
                        tracing::error!(key = %key, "Image upload failed: {}", e);
                        return SubmissionOutcome::upload_failed();
                    }
                }
            }
            None => None,
        };

        let image_url = uploaded.as_ref().map(|b| b.url.clone()).unwrap_or_default();
        let record = report.into_record(image_url, Utc::now());

        match self.report_repo.insert_report(&self.settings.collection, &record).await {
            Ok(id) => {
                tracing::info!(report_id = %id, collection = %self.settings.collection, "Report stored");
                SubmissionOutcome::accepted(id)
            }
            Err(e) => {
                tracing::error!("Error submitting report: {}", e);
                if let Some(blob) = uploaded {
                    self.discard_orphan(&blob.key).await;
                }
                SubmissionOutcome::persist_failed(persist_failure_message(&e))
            }
        }
    }

    /// Writes the fixed test record, bypassing normalization, validation and upload.
    pub async fn submit_dummy(&self) -> SubmissionOutcome {
        tracing::info!("Attempting to submit dummy data...");
        let record = ReportRecord::dummy(Utc::now());

        match self.report_repo.insert_report(&self.settings.collection, &record).await {
            Ok(id) => SubmissionOutcome::accepted(id),
            Err(e) => {
                tracing::error!("Dummy data submission failed: {}", e);
                SubmissionOutcome::persist_failed(MSG_SUBMIT_FAILED.to_string())
            }
        }
    }

    /// Best-effort removal of a photo whose report could not be stored.
    async fn discard_orphan(&self, key: &str) {
        match self.blob_store.delete(key).await {
            Ok(()) => tracing::info!(key = %key, "Removed image of unsaved report"),
            Err(e) => tracing::warn!(key = %key, "Could not remove orphaned image: {}", e),
        }
    }
}

fn persist_failure_message(err: &StoreError) -> String {
    match err.detail() {
        Some(detail) => format!("An error occurred while submitting the report: {}", detail),
        None => MSG_SUBMIT_FAILED.to_string(),
    }
}
