use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP001",
        "full_name": "Arjun Sharma",
        "email": "arjun.sharma@company.com",
        "department": "Engineering",
        "phone": "+91-98765-43201",
        "position": "Senior Developer",
        "hire_date": "2023-01-15",
        "salary": 85000.0,
        "status": "Active",
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": null
    })
)]
pub struct Employee {
    /// Storage-internal key; callers address employees by `employee_id`.
    pub id: i64,

    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "Arjun Sharma")]
    pub full_name: String,

    #[schema(example = "arjun.sharma@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    pub phone: Option<String>,

    pub position: Option<String>,

    #[schema(example = "2023-01-15")]
    pub hire_date: Option<NaiveDate>,

    pub salary: Option<f64>,

    #[schema(example = "Active")]
    pub status: String,

    pub created_at: DateTime<Utc>,

    /// Null until the first mutation, stamped on every one after.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "Arjun Sharma")]
    pub full_name: String,
    #[schema(example = "arjun.sharma@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    #[schema(example = "2023-01-15", format = "date")]
    pub hire_date: Option<String>,
    #[schema(example = 85000.0)]
    pub salary: Option<f64>,
    #[serde(default = "default_status")]
    #[schema(example = "Active")]
    pub status: String,
}

fn default_status() -> String {
    "Active".to_string()
}

/// Partial update; only provided fields are applied. The business key is
/// immutable.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub full_name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 0)]
    pub skip: i64,
    #[schema(example = 100)]
    pub limit: i64,
    #[schema(example = 8)]
    pub total: i64,
}
