use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::store;
use crate::utils::time::{round2, working_hours};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub active_employees: i64,
    pub present_today: i64,
    pub absent_today: i64,
    pub late_today: i64,
    pub departments: Vec<String>,
    pub total_departments: usize,
    /// (present + late) / active employees, percent, two decimals.
    pub attendance_rate: f64,
    pub recent_hires: i64,
    pub avg_working_hours: Option<f64>,
    pub recent_attendance: Vec<RecentAttendance>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct RecentAttendance {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub department: String,
}

/// Dashboard snapshot for "now": computed on read from raw rows, no running
/// aggregates to invalidate.
pub async fn snapshot(pool: &SqlitePool) -> Result<DashboardStats, ApiError> {
    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    let active_employees =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE status = 'Active'")
            .fetch_one(pool)
            .await?;

    let today = Local::now().date_naive();
    let today_records = sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE date = ?")
        .bind(today)
        .fetch_all(pool)
        .await?;

    let mut present_today = 0i64;
    let mut absent_today = 0i64;
    let mut late_today = 0i64;
    for record in &today_records {
        match AttendanceStatus::from_str(&record.status) {
            Ok(AttendanceStatus::Present) => present_today += 1,
            Ok(AttendanceStatus::Absent) => absent_today += 1,
            Ok(AttendanceStatus::Late) => late_today += 1,
            _ => {}
        }
    }

    let attendance_rate = if active_employees > 0 {
        round2((present_today + late_today) as f64 / active_employees as f64 * 100.0)
    } else {
        0.0
    };

    // ISO date strings compare lexicographically, so the cutoff binds
    // directly against the stored text.
    let thirty_days_ago = today - Duration::days(30);
    let recent_hires =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE hire_date >= ?")
            .bind(thirty_days_ago)
            .fetch_one(pool)
            .await?;

    let seven_days_ago = today - Duration::days(7);
    let week_records = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance \
         WHERE date >= ? AND check_in_time IS NOT NULL AND check_out_time IS NOT NULL",
    )
    .bind(seven_days_ago)
    .fetch_all(pool)
    .await?;

    let mut total_hours = 0.0;
    let mut hours_count = 0u32;
    for record in &week_records {
        let hours = working_hours(
            record.check_in_time.as_deref(),
            record.check_out_time.as_deref(),
        );
        if hours > 0.0 {
            total_hours += hours;
            hours_count += 1;
        }
    }
    let avg_working_hours = if hours_count > 0 {
        Some(round2(total_hours / hours_count as f64))
    } else {
        None
    };

    // Insertion order, capped at 10; rows whose employee was deleted are
    // skipped here (the attendance list is the orphan-tolerant read path).
    let recent_attendance = sqlx::query_as::<_, RecentAttendance>(
        "SELECT a.employee_id, e.full_name AS employee_name, a.date, a.status, \
                a.check_in_time, a.check_out_time, e.department \
         FROM attendance a \
         JOIN employees e ON e.employee_id = a.employee_id \
         WHERE a.date = ? ORDER BY a.id LIMIT 10",
    )
    .bind(today)
    .fetch_all(pool)
    .await?;

    let departments = store::employee::departments(pool).await?;
    let total_departments = departments.len();

    Ok(DashboardStats {
        total_employees,
        active_employees,
        present_today,
        absent_today,
        late_today,
        departments,
        total_departments,
        attendance_rate,
        recent_hires,
        avg_working_hours,
        recent_attendance,
        last_updated: Utc::now(),
    })
}
