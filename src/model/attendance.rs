use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::utils::time::working_hours;

/// Fixed attendance status set; the stored string is the canonical
/// `Display` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    #[strum(serialize = "Half Day")]
    HalfDay,
    #[strum(serialize = "Work From Home")]
    WorkFromHome,
}

impl AttendanceStatus {
    pub fn valid_set() -> String {
        AttendanceStatus::iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: i64,
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Mark-attendance payload. Re-marking the same (employee, date) pair is an
/// upsert, not a duplicate.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "2026-01-05", format = "date")]
    pub date: String,
    #[schema(example = "Present")]
    pub status: String,
    #[schema(example = "08:30")]
    pub check_in_time: Option<String>,
    #[schema(example = "17:30")]
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
}

/// Attendance row enriched at read time with the employee display name
/// (degrades to "Unknown Employee" for orphaned rows) and computed working
/// hours.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceResponse {
    pub id: i64,
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "Arjun Sharma")]
    pub employee_name: String,
    #[schema(example = "2026-01-05")]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub status: String,
    #[schema(example = "08:30")]
    pub check_in_time: Option<String>,
    #[schema(example = "17:30")]
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
    #[sqlx(default)]
    #[schema(example = 9.0)]
    pub working_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AttendanceResponse {
    pub fn from_record(record: Attendance, employee_name: String) -> Self {
        let working_hours = computed_hours(&record.check_in_time, &record.check_out_time);
        Self {
            id: record.id,
            employee_id: record.employee_id,
            employee_name,
            date: record.date,
            status: record.status,
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            notes: record.notes,
            working_hours,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Fills the computed column after a row fetch.
    pub fn fill_working_hours(&mut self) {
        self.working_hours = computed_hours(&self.check_in_time, &self.check_out_time);
    }
}

fn computed_hours(check_in: &Option<String>, check_out: &Option<String>) -> Option<f64> {
    match (check_in.as_deref(), check_out.as_deref()) {
        (Some(ci), Some(co)) => Some(working_hours(Some(ci), Some(co))),
        _ => None,
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceResponse>,
    #[schema(example = 0)]
    pub skip: i64,
    #[schema(example = 100)]
    pub limit: i64,
    #[schema(example = 42)]
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_display() {
        for status in AttendanceStatus::iter() {
            assert_eq!(AttendanceStatus::from_str(&status.to_string()), Ok(status));
        }
    }

    #[test]
    fn multi_word_statuses_serialize_with_spaces() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "Half Day");
        assert_eq!(AttendanceStatus::WorkFromHome.to_string(), "Work From Home");
        assert!(AttendanceStatus::from_str("half day").is_err());
    }

    #[test]
    fn valid_set_lists_all_statuses() {
        let set = AttendanceStatus::valid_set();
        assert_eq!(set, "Present, Absent, Late, Half Day, Work From Home");
    }
}
