//! Liveness and readiness probes.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Body of `GET /health/live`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Body of `GET /health/ready`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessStatus {
    /// `ready` or `not_ready`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Per-dependency status.
    pub dependencies: DependencyHealth,
}

/// Status of each dependency.
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyHealth {
    /// `healthy` or `unhealthy`.
    pub history: String,
    /// Name of the configured scoring provider.
    pub provider: String,
}

/// `GET /health/live`: 200 while the process is running.
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /health/ready`: 200 when the history store answers, 503 otherwise.
pub async fn readiness(state: web::Data<AppState>) -> impl Responder {
    let history_ok = match state.service.check_history().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "History health check failed");
            false
        }
    };

    let status = ReadinessStatus {
        status: if history_ok { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            history: if history_ok { "healthy" } else { "unhealthy" }.to_string(),
            provider: state.service.provider_name().to_string(),
        },
    };

    if history_ok {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

/// Register the health routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health/live", web::get().to(liveness))
        .route("/health/ready", web::get().to(readiness));
}
