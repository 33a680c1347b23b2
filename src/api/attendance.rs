use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::model::attendance::{AttendanceListResponse, AttendanceResponse, MarkAttendance};
use crate::store;
use crate::store::attendance::AttendanceFilter;
use crate::utils::validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Exact date (YYYY-MM-DD)
    pub date: Option<String>,
    pub employee_id: Option<String>,
    /// Exact status match
    pub status: Option<String>,
    /// Inclusive lower bound (YYYY-MM-DD)
    pub date_from: Option<String>,
    /// Inclusive upper bound (YYYY-MM-DD)
    pub date_to: Option<String>,
}

/// List attendance records with advanced filtering
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceListQuery),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 400, description = "Malformed date filter"),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (skip, limit) = super::page(query.skip, query.limit);
    let filter = AttendanceFilter {
        date: query
            .date
            .as_deref()
            .map(|v| validate::date("date", v))
            .transpose()?,
        employee_id: query.employee_id.clone(),
        status: query.status.clone(),
        date_from: query
            .date_from
            .as_deref()
            .map(|v| validate::date("date_from", v))
            .transpose()?,
        date_to: query
            .date_to
            .as_deref()
            .map(|v| validate::date("date_to", v))
            .transpose()?,
    };

    let (data, total) = store::attendance::list(pool.get_ref(), &filter, skip, limit).await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        skip,
        limit,
        total,
    }))
}

/// Mark or update attendance for an (employee, date) pair
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked or updated", body = AttendanceResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Referenced employee not found")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let valid = validate::new_attendance(&payload)?;
    let details = json!({ "attendance": &valid });
    let entity_id = format!("{}_{}", valid.employee_id, valid.date);

    let (record, created) = store::attendance::mark_or_update(pool.get_ref(), valid).await?;

    let action = if created { "CREATE" } else { "UPDATE" };
    store::audit::record(pool.get_ref(), action, "attendance", &entity_id, details);
    info!(
        employee_id = %record.employee_id,
        date = %record.date,
        status = %record.status,
        created,
        "attendance marked"
    );

    Ok(HttpResponse::Created().json(record))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeAttendanceQuery {
    /// Inclusive lower bound (YYYY-MM-DD)
    pub date_from: Option<String>,
    /// Inclusive upper bound (YYYY-MM-DD)
    pub date_to: Option<String>,
    pub limit: Option<i64>,
}

/// Attendance history for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee business key"),
        EmployeeAttendanceQuery
    ),
    responses(
        (status = 200, description = "Attendance records, newest first", body = [AttendanceResponse]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    query: web::Query<EmployeeAttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let (_, limit) = super::page(None, query.limit);
    let date_from = query
        .date_from
        .as_deref()
        .map(|v| validate::date("date_from", v))
        .transpose()?;
    let date_to = query
        .date_to
        .as_deref()
        .map(|v| validate::date("date_to", v))
        .transpose()?;

    let records =
        store::attendance::for_employee(pool.get_ref(), &employee_id, date_from, date_to, limit)
            .await?;

    Ok(HttpResponse::Ok().json(records))
}
