use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::model::employee::{CreateEmployee, Employee, EmployeeListResponse, UpdateEmployee};
use crate::store;
use crate::store::employee::EmployeeFilter;
use crate::utils::validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeListQuery {
    /// Records to skip
    pub skip: Option<i64>,
    /// Page size, default 100
    pub limit: Option<i64>,
    /// Case-insensitive department substring
    pub department: Option<String>,
    /// Exact status match
    pub status: Option<String>,
    /// Case-insensitive substring over name, ID and email
    pub search: Option<String>,
}

/// List employees with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeListQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Employees"
)]
pub async fn list_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (skip, limit) = super::page(query.skip, query.limit);
    let filter = EmployeeFilter {
        department: query.department.clone(),
        status: query.status.clone(),
        search: query.search.clone(),
    };

    let (data, total) = store::employee::list(pool.get_ref(), &filter, skip, limit).await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        skip,
        limit,
        total,
    }))
}

/// Create a new employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation failure or duplicate employee_id/email"),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let valid = validate::new_employee(&payload)?;
    let employee = store::employee::create(pool.get_ref(), valid).await?;

    store::audit::record(
        pool.get_ref(),
        "CREATE",
        "employee",
        &employee.employee_id,
        json!({ "employee": &employee }),
    );
    info!(employee_id = %employee.employee_id, "employee created");

    Ok(HttpResponse::Created().json(employee))
}

/// Get employee by business key
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee business key")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee = store::employee::get(pool.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update employee fields
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee business key")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let changes = validate::employee_update(&payload)?;
    let no_op = changes.is_empty();
    let details = json!({ "updated_fields": &changes });

    let employee = store::employee::update(pool.get_ref(), &employee_id, changes).await?;

    if !no_op {
        store::audit::record(
            pool.get_ref(),
            "UPDATE",
            "employee",
            &employee.employee_id,
            details,
        );
        info!(employee_id = %employee.employee_id, "employee updated");
    }

    Ok(HttpResponse::Ok().json(employee))
}

/// Delete employee and cascade its attendance records
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee business key")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted successfully",
            "employee_id": "EMP001",
            "attendance_records_deleted": 22
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let (employee, cascaded) = store::employee::delete(pool.get_ref(), &employee_id).await?;

    store::audit::record(
        pool.get_ref(),
        "DELETE",
        "employee",
        &employee.employee_id,
        json!({
            "employee": &employee,
            "attendance_records_deleted": cascaded,
        }),
    );
    info!(
        employee_id = %employee.employee_id,
        attendance_records_deleted = cascaded,
        "employee deleted"
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
        "employee_id": employee.employee_id,
        "attendance_records_deleted": cascaded,
    })))
}
