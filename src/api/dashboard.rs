use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::stats::dashboard::{self, DashboardStats};

/// Dashboard snapshot with live roster and attendance statistics
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let stats = dashboard::snapshot(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
