use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;

use crate::db;
use crate::error::ApiError;

/// API root with system information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "System information")
    ),
    tag = "System"
)]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "HRMS Lite API - Production Ready",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "timestamp": Utc::now().to_rfc3339(),
        "documentation": "/api-doc/openapi.json",
        "health_check": "/health",
    }))
}

/// Liveness check: pings the store and reports basic store statistics
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = Object, example = json!({
            "status": "healthy",
            "database": {"status": "connected", "employees": 8, "attendance_records": 176}
        })),
        (status = 503, description = "Store unreachable")
    ),
    tag = "System"
)]
pub async fn health(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    if let Err(e) = db::ping(pool.get_ref()).await {
        error!(error = %e, "health check failed");
        return Err(ApiError::Unavailable);
    }
    let stats = db::store_stats(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "database": {
            "status": "connected",
            "employees": stats.employees,
            "attendance_records": stats.attendance_records,
            "audit_entries": stats.audit_entries,
            "data_size": stats.data_size,
        },
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
