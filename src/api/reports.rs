use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::stats::reports::{
    self, AttendanceSummaryReport, DepartmentReport, EmployeePerformanceReport,
};
use crate::utils::validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Inclusive range start (YYYY-MM-DD), required
    pub date_from: Option<String>,
    /// Inclusive range end (YYYY-MM-DD), required
    pub date_to: Option<String>,
    /// Restrict to one department (exact name)
    pub department: Option<String>,
}

/// Attendance summary report for a date range
#[utoipa::path(
    get,
    path = "/api/reports/attendance-summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Aggregate counts plus per-employee breakdown", body = AttendanceSummaryReport),
        (status = 400, description = "Missing or malformed date range")
    ),
    tag = "Reports"
)]
pub async fn attendance_summary(
    pool: web::Data<SqlitePool>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, ApiError> {
    let date_from = required_date("date_from", query.date_from.as_deref())?;
    let date_to = required_date("date_to", query.date_to.as_deref())?;

    let report = reports::attendance_summary(
        pool.get_ref(),
        date_from,
        date_to,
        query.department.clone(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(report))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeQuery {
    /// Inclusive range start (YYYY-MM-DD), required
    pub date_from: Option<String>,
    /// Inclusive range end (YYYY-MM-DD), required
    pub date_to: Option<String>,
}

/// Per-employee performance report
#[utoipa::path(
    get,
    path = "/api/reports/employee-performance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee business key"),
        RangeQuery
    ),
    responses(
        (status = 200, description = "Day counts, hours and per-day records", body = EmployeePerformanceReport),
        (status = 404, description = "Employee not found")
    ),
    tag = "Reports"
)]
pub async fn employee_performance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let date_from = required_date("date_from", query.date_from.as_deref())?;
    let date_to = required_date("date_to", query.date_to.as_deref())?;

    let report =
        reports::employee_performance(pool.get_ref(), &employee_id, date_from, date_to).await?;

    Ok(HttpResponse::Ok().json(report))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DepartmentQuery {
    /// Department name (exact), required
    pub department: Option<String>,
    /// Inclusive range start (YYYY-MM-DD), required
    pub date_from: Option<String>,
    /// Inclusive range end (YYYY-MM-DD), required
    pub date_to: Option<String>,
}

/// Department-wide report
#[utoipa::path(
    get,
    path = "/api/reports/department",
    params(DepartmentQuery),
    responses(
        (status = 200, description = "Department aggregates plus per-employee breakdown", body = DepartmentReport),
        (status = 404, description = "No employees in the department")
    ),
    tag = "Reports"
)]
pub async fn department_report(
    pool: web::Data<SqlitePool>,
    query: web::Query<DepartmentQuery>,
) -> Result<HttpResponse, ApiError> {
    let department = query
        .department
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation("department", "is required"))?;
    let date_from = required_date("date_from", query.date_from.as_deref())?;
    let date_to = required_date("date_to", query.date_to.as_deref())?;

    let report = reports::department_report(pool.get_ref(), department, date_from, date_to).await?;

    Ok(HttpResponse::Ok().json(report))
}

fn required_date(field: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    match value {
        Some(v) => validate::date(field, v),
        None => Err(ApiError::validation(field, "is required")),
    }
}
