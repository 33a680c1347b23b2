use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::BindValue;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceResponse};
use crate::utils::validate::ValidAttendance;

#[derive(Debug, Default)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub employee_id: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Marks attendance for an (employee, date) pair. The referenced employee
/// must exist. A second mark for the same pair overwrites every field except
/// `created_at` and stamps `updated_at`; the unique index makes the upsert
/// race-safe, the pre-fetch only decides created-versus-updated for the
/// caller.
pub async fn mark_or_update(
    pool: &SqlitePool,
    record: ValidAttendance,
) -> Result<(AttendanceResponse, bool), ApiError> {
    let employee = super::employee::get(pool, &record.employee_id).await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(&record.employee_id)
    .bind(record.date)
    .fetch_optional(pool)
    .await?;
    let created = existing.is_none();

    let now = Utc::now();
    sqlx::query(
        "INSERT INTO attendance \
         (employee_id, date, status, check_in_time, check_out_time, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, NULL) \
         ON CONFLICT(employee_id, date) DO UPDATE SET \
             status = excluded.status, \
             check_in_time = excluded.check_in_time, \
             check_out_time = excluded.check_out_time, \
             notes = excluded.notes, \
             updated_at = ?",
    )
    .bind(&record.employee_id)
    .bind(record.date)
    .bind(&record.status)
    .bind(&record.check_in_time)
    .bind(&record.check_out_time)
    .bind(&record.notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(&record.employee_id)
    .bind(record.date)
    .fetch_one(pool)
    .await?;

    Ok((
        AttendanceResponse::from_record(row, employee.full_name),
        created,
    ))
}

/// Filtered, paginated attendance listing. Rows are enriched with the
/// employee display name at read time; rows whose employee has since been
/// deleted degrade to "Unknown Employee" instead of failing the read.
pub async fn list(
    pool: &SqlitePool,
    filter: &AttendanceFilter,
    skip: i64,
    limit: i64,
) -> Result<(Vec<AttendanceResponse>, i64), ApiError> {
    let mut conditions = Vec::new();
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(date) = filter.date {
        conditions.push("a.date = ?");
        binds.push(BindValue::Date(date));
    } else {
        if let Some(from) = filter.date_from {
            conditions.push("a.date >= ?");
            binds.push(BindValue::Date(from));
        }
        if let Some(to) = filter.date_to {
            conditions.push("a.date <= ?");
            binds.push(BindValue::Date(to));
        }
    }
    if let Some(employee_id) = &filter.employee_id {
        conditions.push("a.employee_id = ?");
        binds.push(BindValue::Text(employee_id.trim().to_uppercase()));
    }
    if let Some(status) = &filter.status {
        conditions.push("a.status = ?");
        binds.push(BindValue::Text(status.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM attendance a {}", where_clause);
    debug!(sql = %count_sql, "counting attendance records");
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
        "SELECT a.id, a.employee_id, \
                COALESCE(e.full_name, 'Unknown Employee') AS employee_name, \
                a.date, a.status, a.check_in_time, a.check_out_time, a.notes, \
                a.created_at, a.updated_at \
         FROM attendance a \
         LEFT JOIN employees e ON e.employee_id = a.employee_id \
         {} ORDER BY a.date DESC, a.employee_id ASC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, skip, limit, "fetching attendance records");
    let mut data_query = sqlx::query_as::<_, AttendanceResponse>(&data_sql);
    for bind in binds {
        data_query = match bind {
            BindValue::Text(v) => data_query.bind(v),
            BindValue::Real(v) => data_query.bind(v),
            BindValue::Date(v) => data_query.bind(v),
            BindValue::Timestamp(v) => data_query.bind(v),
        };
    }
    let mut rows = data_query.bind(limit).bind(skip).fetch_all(pool).await?;
    for row in &mut rows {
        row.fill_working_hours();
    }

    Ok((rows, total))
}

/// Attendance history for one employee, newest first, optionally bounded by
/// an inclusive date range.
pub async fn for_employee(
    pool: &SqlitePool,
    employee_id: &str,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<AttendanceResponse>, ApiError> {
    let employee = super::employee::get(pool, employee_id).await?;

    let mut conditions = vec!["employee_id = ?"];
    let mut binds = vec![BindValue::Text(employee.employee_id.clone())];
    if let Some(from) = date_from {
        conditions.push("date >= ?");
        binds.push(BindValue::Date(from));
    }
    if let Some(to) = date_to {
        conditions.push("date <= ?");
        binds.push(BindValue::Date(to));
    }

    let sql = format!(
        "SELECT * FROM attendance WHERE {} ORDER BY date DESC LIMIT ?",
        conditions.join(" AND ")
    );
    let mut query = sqlx::query_as::<_, Attendance>(&sql);
    for bind in binds {
        query = match bind {
            BindValue::Text(v) => query.bind(v),
            BindValue::Real(v) => query.bind(v),
            BindValue::Date(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
        };
    }
    let rows = query.bind(limit).fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|row| AttendanceResponse::from_record(row, employee.full_name.clone()))
        .collect())
}
