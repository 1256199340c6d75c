use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::Duration,
};
use sysinfo::System;

use crate::{constants::START_TIME, repositories::report::ReportRepository, AppState};

const CACHE_SECS: i64 = 5;
const UNKNOWN: &str = "Unknown";

#[derive(Serialize, Clone, Default)]
struct HostInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
    process_memory: String,
}

#[derive(Serialize, Clone, Default)]
struct Checks {
    store_backend: String,
    store_status: String,
    guidance: String,
}

#[derive(Serialize, Clone, Default)]
struct HealthReport {
    status: String,
    version: String,
    uptime: String,
    started_at: String,
    checked_at: String,
    #[serde(flatten)]
    checks: Checks,
    host: HostInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_REPORT: Lazy<RwLock<HealthReport>> = Lazy::new(|| RwLock::new(HealthReport::default()));

fn host_info() -> HostInfo {
    let mut sys = System::new_all();
    sys.refresh_all();

    let process_memory = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or_else(|| UNKNOWN.to_string(), |p| format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0));

    HostInfo {
        os: System::name().unwrap_or_else(|| UNKNOWN.to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string()),
        hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
        process_memory,
    }
}

async fn run_checks(state: &AppState) -> Checks {
    let handler = &state.submission_handler;
    let store_status = match handler.report_repo.ping(&handler.settings.collection).await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "Unavailable"
        }
    };

    Checks {
        store_backend: state.store_backend.to_string(),
        store_status: store_status.to_string(),
        guidance: if state.guidance_enabled { "Configured" } else { "Not configured" }.to_string(),
    }
}

async fn build_report(state: &AppState) -> HealthReport {
    let now = Utc::now();
    let uptime_secs = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;
    let checks = run_checks(state).await;

    HealthReport {
        status: if checks.store_status == "OK" { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        started_at: START_TIME.to_rfc3339(),
        checked_at: now.to_rfc3339(),
        checks,
        host: host_info(),
    }
}

/// Liveness plus a store check, cached for `CACHE_SECS`.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();

    if now - LAST_CHECK.load(Ordering::Relaxed) <= CACHE_SECS {
        return HttpResponse::Ok().json(CACHED_REPORT.read().clone());
    }

    let report = build_report(&state).await;
    *CACHED_REPORT.write() = report.clone();
    LAST_CHECK.store(now, Ordering::Relaxed);

    HttpResponse::Ok().json(report)
}
