use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod logging;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{ai, firebase, memory, utils};

use ai::gemini::GeminiGuidanceService;
use errors::AppError;
use firebase::{firestore::FirestoreReportRepo, storage::FirebaseBlobStore, FirebaseClient};
use memory::{InMemoryBlobStore, InMemoryReportRepo};
use repositories::{blob::BlobStore, guidance::GuidanceService, report::ReportRepository};
use settings::{AppConfig, StoreBackend};
use use_cases::{
    guidance::GuidanceHandler,
    submission::{SubmissionHandler, SubmissionSettings},
};

pub type SharedReportRepo = Arc<dyn ReportRepository>;
pub type SharedBlobStore = Arc<dyn BlobStore>;
pub type SharedGuidanceService = Arc<dyn GuidanceService>;

pub type AppSubmissionHandler = SubmissionHandler<SharedReportRepo, SharedBlobStore>;
pub type AppGuidanceHandler = GuidanceHandler<SharedGuidanceService>;

pub struct AppState {
    pub submission_handler: AppSubmissionHandler,
    pub guidance_handler: AppGuidanceHandler,
    pub store_backend: StoreBackend,
    pub guidance_enabled: bool,
}

impl AppState {
    /// Wires the configured backends. Called once at startup.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let (report_repo, blob_store): (SharedReportRepo, SharedBlobStore) = match config.store_backend {
            StoreBackend::Firebase => {
                let client = FirebaseClient::new(config, http.clone());
                (
                    Arc::new(FirestoreReportRepo::new(client.clone())),
                    Arc::new(FirebaseBlobStore::new(client)),
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; reports are lost on restart");
                (
                    Arc::new(InMemoryReportRepo::new()),
                    Arc::new(InMemoryBlobStore::new()),
                )
            }
        };

        let guidance_service = Arc::new(GeminiGuidanceService::new(config, http));

        Ok(Self::with_services(config, report_repo, blob_store, guidance_service))
    }

    pub fn with_services(
        config: &AppConfig,
        report_repo: SharedReportRepo,
        blob_store: SharedBlobStore,
        guidance_service: SharedGuidanceService,
    ) -> Self {
        let settings = SubmissionSettings {
            collection: config.reports_collection.clone(),
            image_prefix: config.image_prefix.clone(),
        };

        AppState {
            submission_handler: SubmissionHandler::new(report_repo, blob_store, settings),
            guidance_handler: GuidanceHandler::new(guidance_service),
            store_backend: config.store_backend,
            guidance_enabled: config.guidance_enabled(),
        }
    }
}
