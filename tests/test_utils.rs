#![allow(dead_code)]

use actix_web::{
    middleware::NormalizePath,
    web,
    App, HttpServer
};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use safelink_backend::{
    entities::report::ReportRecord,
    errors::GuidanceError,
    memory::{InMemoryBlobStore, InMemoryReportRepo},
    repositories::guidance::GuidanceService,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use serde_json::Value;
use std::{net::TcpListener, sync::Arc, time::Duration};

/// Guidance collaborator that records prompts and replies with a canned answer.
#[derive(Default)]
pub struct StubGuidance {
    pub prompts: Mutex<Vec<String>>,
    pub reply: Mutex<Option<String>>,
}

impl StubGuidance {
    pub fn answering(reply: &str) -> Self {
        StubGuidance {
            prompts: Mutex::new(Vec::new()),
            reply: Mutex::new(Some(reply.to_string())),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GuidanceService for StubGuidance {
    async fn generate(&self, prompt: &str) -> Result<String, GuidanceError> {
        self.prompts.lock().push(prompt.to_string());
        self.reply
            .lock()
            .clone()
            .ok_or_else(|| GuidanceError::Transport("connection refused".into()))
    }
}

#[derive(Clone)]
pub struct TestApp {
    pub state: Arc<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
    pub reports: Arc<InMemoryReportRepo>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub guidance: Arc<StubGuidance>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_guidance(StubGuidance::answering("Mention clothing and distinctive marks.")).await
    }

    pub async fn spawn_with_guidance(guidance: StubGuidance) -> Self {
        let config = test_config();

        let reports = Arc::new(InMemoryReportRepo::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let guidance = Arc::new(guidance);

        let state = Arc::new(AppState::with_services(
            &config,
            reports.clone(),
            blobs.clone(),
            guidance.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .disable_signals()
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
            reports,
            blobs,
            guidance,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_report_json(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/reports"))
            .json(body)
            .send()
            .await
            .expect("Failed to submit report")
    }

    pub async fn post_report_form(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/reports"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to submit report form")
    }

    pub async fn post_guidance(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/guidance"))
            .json(body)
            .send()
            .await
            .expect("Failed to request guidance")
    }

    pub fn stored_reports(&self) -> Vec<(String, ReportRecord)> {
        self.reports.records(&self.config.reports_collection)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "SafeLink Test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        worker_count: 1,
        cors_allowed_origins: vec!["*".to_string()],
        gemini_api_key: Some("test-key".to_string()),
        ..Default::default()
    }
}
