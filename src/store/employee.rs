use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::BindValue;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::utils::validate::{EmployeeChanges, ValidEmployee};

#[derive(Debug, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Inserts a new employee. The existence pre-checks produce friendly
/// messages; the unique indexes on `employee_id` and `email` remain the
/// authority under concurrent creates, and their violation is translated to
/// the same `Conflict`.
pub async fn create(pool: &SqlitePool, employee: ValidEmployee) -> Result<Employee, ApiError> {
    if find(pool, &employee.employee_id).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "Employee ID '{}' already exists",
            employee.employee_id
        )));
    }
    let email_taken =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE email = ?")
            .bind(&employee.email)
            .fetch_one(pool)
            .await?;
    if email_taken > 0 {
        return Err(ApiError::conflict(format!(
            "Email '{}' already exists",
            employee.email
        )));
    }

    let result = sqlx::query(
        "INSERT INTO employees \
         (employee_id, full_name, email, department, phone, position, hire_date, salary, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)",
    )
    .bind(&employee.employee_id)
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.department)
    .bind(&employee.phone)
    .bind(&employee.position)
    .bind(employee.hire_date)
    .bind(employee.salary)
    .bind(&employee.status)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let created = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await?;
    Ok(created)
}

pub async fn find(pool: &SqlitePool, employee_id: &str) -> Result<Option<Employee>, ApiError> {
    let key = employee_id.trim().to_uppercase();
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn get(pool: &SqlitePool, employee_id: &str) -> Result<Employee, ApiError> {
    find(pool, employee_id).await?.ok_or_else(|| {
        ApiError::not_found(format!(
            "Employee with ID '{}' not found",
            employee_id.trim().to_uppercase()
        ))
    })
}

/// Applies only the provided fields and stamps `updated_at`. An email change
/// is re-checked for uniqueness against all other employees first.
pub async fn update(
    pool: &SqlitePool,
    employee_id: &str,
    changes: EmployeeChanges,
) -> Result<Employee, ApiError> {
    let existing = get(pool, employee_id).await?;

    if changes.is_empty() {
        return Ok(existing);
    }

    if let Some(email) = &changes.email {
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE email = ? AND employee_id != ?",
        )
        .bind(email)
        .bind(&existing.employee_id)
        .fetch_one(pool)
        .await?;
        if taken > 0 {
            return Err(ApiError::conflict(format!(
                "Email '{}' already exists",
                email
            )));
        }
    }

    let mut sets = Vec::new();
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(full_name) = changes.full_name {
        sets.push("full_name = ?");
        binds.push(BindValue::Text(full_name));
    }
    if let Some(email) = changes.email {
        sets.push("email = ?");
        binds.push(BindValue::Text(email));
    }
    if let Some(department) = changes.department {
        sets.push("department = ?");
        binds.push(BindValue::Text(department));
    }
    if let Some(phone) = changes.phone {
        sets.push("phone = ?");
        binds.push(BindValue::Text(phone));
    }
    if let Some(position) = changes.position {
        sets.push("position = ?");
        binds.push(BindValue::Text(position));
    }
    if let Some(salary) = changes.salary {
        sets.push("salary = ?");
        binds.push(BindValue::Real(salary));
    }
    if let Some(status) = changes.status {
        sets.push("status = ?");
        binds.push(BindValue::Text(status));
    }
    sets.push("updated_at = ?");
    binds.push(BindValue::Timestamp(Utc::now()));

    let sql = format!(
        "UPDATE employees SET {} WHERE employee_id = ?",
        sets.join(", ")
    );
    debug!(sql = %sql, employee_id = %existing.employee_id, "updating employee");

    let mut query = sqlx::query(&sql);
    for bind in binds {
        query = match bind {
            BindValue::Text(v) => query.bind(v),
            BindValue::Real(v) => query.bind(v),
            BindValue::Date(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
        };
    }
    query.bind(&existing.employee_id).execute(pool).await?;

    get(pool, &existing.employee_id).await
}

/// Deletes the employee and its attendance records in one transaction and
/// returns the deleted row plus the cascaded attendance count.
pub async fn delete(pool: &SqlitePool, employee_id: &str) -> Result<(Employee, u64), ApiError> {
    let existing = get(pool, employee_id).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(&existing.employee_id)
        .execute(&mut *tx)
        .await?;
    let cascaded = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(&existing.employee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;

    Ok((existing, cascaded))
}

/// Filtered, paginated listing sorted by creation time descending.
pub async fn list(
    pool: &SqlitePool,
    filter: &EmployeeFilter,
    skip: i64,
    limit: i64,
) -> Result<(Vec<Employee>, i64), ApiError> {
    let mut conditions = Vec::new();
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(department) = &filter.department {
        conditions.push("department LIKE ?");
        binds.push(BindValue::Text(format!("%{}%", department)));
    }
    if let Some(status) = &filter.status {
        conditions.push("status = ?");
        binds.push(BindValue::Text(status.clone()));
    }
    if let Some(search) = &filter.search {
        conditions.push("(full_name LIKE ? OR employee_id LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        binds.push(BindValue::Text(like.clone()));
        binds.push(BindValue::Text(like.clone()));
        binds.push(BindValue::Text(like));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM employees {}", where_clause);
    debug!(sql = %count_sql, "counting employees");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_query = match bind {
            BindValue::Text(v) => count_query.bind(v.clone()),
            BindValue::Real(v) => count_query.bind(*v),
            BindValue::Date(v) => count_query.bind(*v),
            BindValue::Timestamp(v) => count_query.bind(*v),
        };
    }
    let total = count_query.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, skip, limit, "fetching employees");
    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for bind in binds {
        data_query = match bind {
            BindValue::Text(v) => data_query.bind(v),
            BindValue::Real(v) => data_query.bind(v),
            BindValue::Date(v) => data_query.bind(v),
            BindValue::Timestamp(v) => data_query.bind(v),
        };
    }
    let employees = data_query
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

    Ok((employees, total))
}

/// Distinct department names across all employees.
pub async fn departments(pool: &SqlitePool) -> Result<Vec<String>, ApiError> {
    let departments = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT department FROM employees ORDER BY department",
    )
    .fetch_all(pool)
    .await?;
    Ok(departments)
}
