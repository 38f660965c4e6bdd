/// Health handlers - liveness, readiness and a storage-backed summary
use crate::repository::BlogRepository;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

/// Service status backed by a storage round-trip
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy"),
        (status = 503, description = "Storage unavailable"),
    )
)]
pub async fn health_summary(repo: web::Data<Arc<dyn BlogRepository>>) -> HttpResponse {
    match repo.health_check().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "storage": repo.backend_name(),
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": format!("{} check failed", repo.backend_name()),
                "service": "blog-service"
            }))
        }
    }
}

/// Component checks with latency
#[utoipa::path(
    get,
    path = "/api/v1/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "A component is unhealthy"),
    )
)]
pub async fn readiness_summary(repo: web::Data<Arc<dyn BlogRepository>>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let result = repo.health_check().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    let ready = result.is_ok();
    let storage_check = match result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: format!("{} reachable", repo.backend_name()),
            latency_ms,
        },
        Err(e) => ComponentCheck {
            status: ComponentStatus::Unhealthy,
            message: format!("{} check failed: {}", repo.backend_name(), e.public_message()),
            latency_ms,
        },
    };
    checks.insert("storage".to_string(), storage_check);

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/health/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
