//! Liveness check for load balancers and uptime monitors.

use actix_web::HttpResponse;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

const SERVICE_NAME: &str = "quill-api";

/// Body of `GET /api/health`, sent without the `ApiResponse` envelope.
#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

impl HealthStatus {
    fn up() -> Self {
        Self {
            status: "ok",
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus::up())
}
