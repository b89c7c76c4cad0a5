//! Health check endpoint.

use actix_web::HttpResponse;
use serde::Serialize;

use sparkblog_shared::ApiResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
