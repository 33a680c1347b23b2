use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::store;
use crate::utils::time::{round2, working_hours};

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceSummaryReport {
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    pub date_range: DateRange,
    pub department: Option<String>,
    pub summary: SummaryTotals,
    pub employee_summary: Vec<EmployeeSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryTotals {
    pub total_records: i64,
    pub present_count: i64,
    pub absent_count: i64,
    pub late_count: i64,
    /// present / total records, percent, two decimals.
    pub attendance_rate: f64,
}

/// Fixed named counters per status; no string-keyed maps in the aggregation
/// path.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub half_day: i64,
    pub work_from_home: i64,
    pub total_hours: f64,
}

impl EmployeeSummary {
    fn new(employee_id: String) -> Self {
        Self {
            employee_id,
            present: 0,
            absent: 0,
            late: 0,
            half_day: 0,
            work_from_home: 0,
            total_hours: 0.0,
        }
    }

    fn bump(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
            AttendanceStatus::WorkFromHome => self.work_from_home += 1,
        }
    }
}

/// Attendance summary over a date range, optionally restricted to one
/// department. The department restriction is a post-filter on employee_id
/// membership, not a join.
pub async fn attendance_summary(
    pool: &SqlitePool,
    date_from: NaiveDate,
    date_to: NaiveDate,
    department: Option<String>,
) -> Result<AttendanceSummaryReport, ApiError> {
    let mut records = fetch_range(pool, date_from, date_to).await?;

    if let Some(department) = &department {
        let member_ids: HashSet<String> = sqlx::query_scalar::<_, String>(
            "SELECT employee_id FROM employees WHERE department = ?",
        )
        .bind(department)
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();
        records.retain(|r| member_ids.contains(&r.employee_id));
    }

    let total_records = records.len() as i64;
    let mut present_count = 0i64;
    let mut absent_count = 0i64;
    let mut late_count = 0i64;
    let mut per_employee: BTreeMap<String, EmployeeSummary> = BTreeMap::new();

    for record in &records {
        let Ok(status) = AttendanceStatus::from_str(&record.status) else {
            continue;
        };
        match status {
            AttendanceStatus::Present => present_count += 1,
            AttendanceStatus::Absent => absent_count += 1,
            AttendanceStatus::Late => late_count += 1,
            _ => {}
        }

        let summary = per_employee
            .entry(record.employee_id.clone())
            .or_insert_with(|| EmployeeSummary::new(record.employee_id.clone()));
        summary.bump(status);
        summary.total_hours += working_hours(
            record.check_in_time.as_deref(),
            record.check_out_time.as_deref(),
        );
    }

    let employee_summary = per_employee
        .into_values()
        .map(|mut s| {
            s.total_hours = round2(s.total_hours);
            s
        })
        .collect();

    Ok(AttendanceSummaryReport {
        report_type: "attendance_summary".to_string(),
        generated_at: Utc::now(),
        date_range: DateRange {
            from: date_from,
            to: date_to,
        },
        department,
        summary: SummaryTotals {
            total_records,
            present_count,
            absent_count,
            late_count,
            attendance_rate: rate(present_count, total_records),
        },
        employee_summary,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeePerformanceReport {
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    pub employee: EmployeeBrief,
    pub date_range: DateRange,
    pub summary: PerformanceSummary,
    pub attendance_records: Vec<PerformanceDay>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeBrief {
    pub employee_id: String,
    pub full_name: String,
    pub department: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerformanceSummary {
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub late_days: i64,
    pub attendance_rate: f64,
    pub total_hours: f64,
    pub avg_hours_per_day: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerformanceDay {
    pub date: NaiveDate,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    /// 0 when either time is missing.
    pub working_hours: f64,
}

/// Per-employee performance over a date range, days ordered ascending.
pub async fn employee_performance(
    pool: &SqlitePool,
    employee_id: &str,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<EmployeePerformanceReport, ApiError> {
    let employee = store::employee::get(pool, employee_id).await?;

    let records = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance \
         WHERE employee_id = ? AND date >= ? AND date <= ? ORDER BY date ASC",
    )
    .bind(&employee.employee_id)
    .bind(date_from)
    .bind(date_to)
    .fetch_all(pool)
    .await?;

    let total_days = records.len() as i64;
    let mut present_days = 0i64;
    let mut absent_days = 0i64;
    let mut late_days = 0i64;
    let mut total_hours = 0.0;
    let mut days = Vec::with_capacity(records.len());

    for record in records {
        match AttendanceStatus::from_str(&record.status) {
            Ok(AttendanceStatus::Present) => present_days += 1,
            Ok(AttendanceStatus::Absent) => absent_days += 1,
            Ok(AttendanceStatus::Late) => late_days += 1,
            _ => {}
        }
        let hours = working_hours(
            record.check_in_time.as_deref(),
            record.check_out_time.as_deref(),
        );
        total_hours += hours;
        days.push(PerformanceDay {
            date: record.date,
            status: record.status,
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            working_hours: hours,
        });
    }

    let avg_hours_per_day = if present_days > 0 {
        round2(total_hours / present_days as f64)
    } else {
        0.0
    };

    Ok(EmployeePerformanceReport {
        report_type: "employee_performance".to_string(),
        generated_at: Utc::now(),
        employee: EmployeeBrief {
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            department: employee.department,
        },
        date_range: DateRange {
            from: date_from,
            to: date_to,
        },
        summary: PerformanceSummary {
            total_days,
            present_days,
            absent_days,
            late_days,
            attendance_rate: rate(present_days, total_days),
            total_hours: round2(total_hours),
            avg_hours_per_day,
        },
        attendance_records: days,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentReport {
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    pub department: String,
    pub date_range: DateRange,
    pub summary: DepartmentTotals,
    pub employee_breakdown: Vec<DepartmentEmployee>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentTotals {
    pub total_employees: i64,
    pub total_records: i64,
    pub present_count: i64,
    pub absent_count: i64,
    pub late_count: i64,
    pub department_attendance_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub half_day: i64,
    pub work_from_home: i64,
    pub total: i64,
    pub attendance_rate: f64,
}

/// Department-wide aggregates plus per-employee breakdown; employees with no
/// records in range still appear with zero counts.
pub async fn department_report(
    pool: &SqlitePool,
    department: &str,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<DepartmentReport, ApiError> {
    let employees = sqlx::query_as::<_, crate::model::employee::Employee>(
        "SELECT * FROM employees WHERE department = ? ORDER BY employee_id",
    )
    .bind(department)
    .fetch_all(pool)
    .await?;
    if employees.is_empty() {
        return Err(ApiError::not_found(format!(
            "No employees found in department '{}'",
            department
        )));
    }

    let placeholders = vec!["?"; employees.len()].join(", ");
    let sql = format!(
        "SELECT * FROM attendance \
         WHERE employee_id IN ({}) AND date >= ? AND date <= ?",
        placeholders
    );
    let mut query = sqlx::query_as::<_, Attendance>(&sql);
    for employee in &employees {
        query = query.bind(employee.employee_id.clone());
    }
    let records = query.bind(date_from).bind(date_to).fetch_all(pool).await?;

    let total_records = records.len() as i64;
    let mut present_count = 0i64;
    let mut absent_count = 0i64;
    let mut late_count = 0i64;
    let mut per_employee: BTreeMap<&str, (i64, i64, i64, i64, i64)> = BTreeMap::new();

    for record in &records {
        let Ok(status) = AttendanceStatus::from_str(&record.status) else {
            continue;
        };
        let counts = per_employee.entry(record.employee_id.as_str()).or_default();
        match status {
            AttendanceStatus::Present => {
                present_count += 1;
                counts.0 += 1;
            }
            AttendanceStatus::Absent => {
                absent_count += 1;
                counts.1 += 1;
            }
            AttendanceStatus::Late => {
                late_count += 1;
                counts.2 += 1;
            }
            AttendanceStatus::HalfDay => counts.3 += 1,
            AttendanceStatus::WorkFromHome => counts.4 += 1,
        }
    }

    let employee_breakdown = employees
        .iter()
        .map(|employee| {
            let (present, absent, late, half_day, work_from_home) = per_employee
                .get(employee.employee_id.as_str())
                .copied()
                .unwrap_or_default();
            let total = present + absent + late + half_day + work_from_home;
            DepartmentEmployee {
                employee_id: employee.employee_id.clone(),
                full_name: employee.full_name.clone(),
                present,
                absent,
                late,
                half_day,
                work_from_home,
                total,
                attendance_rate: rate(present, total),
            }
        })
        .collect();

    Ok(DepartmentReport {
        report_type: "department".to_string(),
        generated_at: Utc::now(),
        department: department.to_string(),
        date_range: DateRange {
            from: date_from,
            to: date_to,
        },
        summary: DepartmentTotals {
            total_employees: employees.len() as i64,
            total_records,
            present_count,
            absent_count,
            late_count,
            department_attendance_rate: rate(present_count, total_records),
        },
        employee_breakdown,
    })
}

async fn fetch_range(
    pool: &SqlitePool,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<Vec<Attendance>, ApiError> {
    let records = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE date >= ? AND date <= ?",
    )
    .bind(date_from)
    .bind(date_to)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

fn rate(hits: i64, total: i64) -> f64 {
    if total > 0 {
        round2(hits as f64 / total as f64 * 100.0)
    } else {
        0.0
    }
}
