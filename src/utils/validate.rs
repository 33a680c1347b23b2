use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;

use crate::error::ApiError;
use crate::model::attendance::{AttendanceStatus, MarkAttendance};
use crate::model::employee::{CreateEmployee, UpdateEmployee};

static EMPLOYEE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static FULL_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s.]+$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Normalized employee payload, safe to hand to the store.
#[derive(Debug, Clone, Serialize)]
pub struct ValidEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub status: String,
}

/// Normalized partial update; `None` fields are left untouched by the store.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.phone.is_none()
            && self.position.is_none()
            && self.salary.is_none()
            && self.status.is_none()
    }
}

/// Normalized attendance payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub notes: Option<String>,
}

pub fn new_employee(payload: &CreateEmployee) -> Result<ValidEmployee, ApiError> {
    Ok(ValidEmployee {
        employee_id: employee_id(&payload.employee_id)?,
        full_name: full_name(&payload.full_name)?,
        email: email(&payload.email)?,
        department: department(&payload.department)?,
        phone: opt(payload.phone.as_deref(), |v| {
            bounded("phone", v, 20).map(str::to_string)
        })?,
        position: opt(payload.position.as_deref(), |v| {
            bounded("position", v, 100).map(str::to_string)
        })?,
        hire_date: opt(payload.hire_date.as_deref(), |v| date("hire_date", v))?,
        salary: opt(payload.salary, salary)?,
        status: payload.status.trim().to_string(),
    })
}

pub fn employee_update(payload: &UpdateEmployee) -> Result<EmployeeChanges, ApiError> {
    Ok(EmployeeChanges {
        full_name: opt(payload.full_name.as_deref(), full_name)?,
        email: opt(payload.email.as_deref(), email)?,
        department: opt(payload.department.as_deref(), department)?,
        phone: opt(payload.phone.as_deref(), |v| {
            bounded("phone", v, 20).map(str::to_string)
        })?,
        position: opt(payload.position.as_deref(), |v| {
            bounded("position", v, 100).map(str::to_string)
        })?,
        salary: opt(payload.salary, salary)?,
        status: payload.status.as_deref().map(|v| v.trim().to_string()),
    })
}

pub fn new_attendance(payload: &MarkAttendance) -> Result<ValidAttendance, ApiError> {
    Ok(ValidAttendance {
        employee_id: employee_id(&payload.employee_id)?,
        date: date("date", &payload.date)?,
        status: status(&payload.status)?,
        check_in_time: opt(payload.check_in_time.as_deref(), |v| {
            time("check_in_time", v)
        })?,
        check_out_time: opt(payload.check_out_time.as_deref(), |v| {
            time("check_out_time", v)
        })?,
        notes: opt(payload.notes.as_deref(), notes)?,
    })
}

fn opt<T, U>(
    value: Option<T>,
    check: impl FnOnce(T) -> Result<U, ApiError>,
) -> Result<Option<U>, ApiError> {
    value.map(check).transpose()
}

pub fn employee_id(raw: &str) -> Result<String, ApiError> {
    let value = bounded("employee_id", raw, 20)?;
    if !EMPLOYEE_ID_RE.is_match(value) {
        return Err(ApiError::validation(
            "employee_id",
            "can only contain letters, numbers, hyphens, and underscores",
        ));
    }
    Ok(value.to_uppercase())
}

fn full_name(raw: &str) -> Result<String, ApiError> {
    let value = bounded("full_name", raw, 100)?;
    if !FULL_NAME_RE.is_match(value) {
        return Err(ApiError::validation(
            "full_name",
            "can only contain letters, spaces, and periods",
        ));
    }
    Ok(title_case(value))
}

fn email(raw: &str) -> Result<String, ApiError> {
    let value = raw.trim();
    if !EMAIL_RE.is_match(value) {
        return Err(ApiError::validation(
            "email",
            "must be a valid email address",
        ));
    }
    Ok(value.to_string())
}

fn department(raw: &str) -> Result<String, ApiError> {
    let value = bounded("department", raw, 50)?;
    Ok(title_case(value))
}

pub fn date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::validation(field, "must be in YYYY-MM-DD format"))
}

fn time(field: &str, raw: &str) -> Result<String, ApiError> {
    let value = raw.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ApiError::validation(field, "must be in HH:MM format"))?;
    Ok(value.to_string())
}

fn status(raw: &str) -> Result<String, ApiError> {
    let status = AttendanceStatus::from_str(raw.trim()).map_err(|_| {
        ApiError::validation(
            "status",
            format!("must be one of: {}", AttendanceStatus::valid_set()),
        )
    })?;
    Ok(status.to_string())
}

fn salary(value: f64) -> Result<f64, ApiError> {
    if value < 0.0 {
        return Err(ApiError::validation("salary", "must not be negative"));
    }
    Ok(value)
}

fn notes(raw: &str) -> Result<String, ApiError> {
    if raw.chars().count() > 500 {
        return Err(ApiError::validation("notes", "must be at most 500 characters"));
    }
    Ok(raw.to_string())
}

fn bounded<'a>(field: &str, raw: &'a str, max: usize) -> Result<&'a str, ApiError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return Err(ApiError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value)
}

/// Title-cases a string: uppercase after any non-alphabetic character,
/// lowercase otherwise.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut boundary = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::MarkAttendance;
    use crate::model::employee::CreateEmployee;

    fn employee_payload() -> CreateEmployee {
        CreateEmployee {
            employee_id: "emp001".to_string(),
            full_name: "arjun sharma".to_string(),
            email: "arjun.sharma@company.com".to_string(),
            department: "engineering".to_string(),
            phone: None,
            position: None,
            hire_date: Some("2023-01-15".to_string()),
            salary: Some(85000.0),
            status: "Active".to_string(),
        }
    }

    #[test]
    fn employee_id_is_uppercased() {
        assert_eq!(employee_id(" emp-001 ").unwrap(), "EMP-001");
    }

    #[test]
    fn employee_id_rejects_bad_charset() {
        let err = employee_id("emp 001").unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "employee_id"));
        assert!(employee_id("emp@001").is_err());
        assert!(employee_id("").is_err());
    }

    #[test]
    fn names_and_departments_are_title_cased() {
        let valid = new_employee(&employee_payload()).unwrap();
        assert_eq!(valid.employee_id, "EMP001");
        assert_eq!(valid.full_name, "Arjun Sharma");
        assert_eq!(valid.department, "Engineering");
    }

    #[test]
    fn title_case_uppercases_after_periods() {
        assert_eq!(title_case("j. r. sharma"), "J. R. Sharma");
        assert_eq!(title_case("MCGREGOR"), "Mcgregor");
    }

    #[test]
    fn full_name_rejects_digits() {
        let mut payload = employee_payload();
        payload.full_name = "arjun 2".to_string();
        assert!(new_employee(&payload).is_err());
    }

    #[test]
    fn email_syntax_is_checked() {
        let mut payload = employee_payload();
        payload.email = "not-an-email".to_string();
        let err = new_employee(&payload).unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "email"));
    }

    #[test]
    fn hire_date_must_be_iso() {
        let mut payload = employee_payload();
        payload.hire_date = Some("15/01/2023".to_string());
        assert!(new_employee(&payload).is_err());
    }

    #[test]
    fn negative_salary_is_rejected() {
        let mut payload = employee_payload();
        payload.salary = Some(-1.0);
        assert!(new_employee(&payload).is_err());
    }

    fn attendance_payload() -> MarkAttendance {
        MarkAttendance {
            employee_id: "emp001".to_string(),
            date: "2026-01-05".to_string(),
            status: "Present".to_string(),
            check_in_time: Some("08:30".to_string()),
            check_out_time: Some("17:30".to_string()),
            notes: None,
        }
    }

    #[test]
    fn attendance_status_must_be_in_fixed_set() {
        let mut payload = attendance_payload();
        payload.status = "Vacation".to_string();
        let err = new_attendance(&payload).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Present"));
        assert!(message.contains("Work From Home"));
    }

    #[test]
    fn attendance_times_must_be_hh_mm() {
        let mut payload = attendance_payload();
        payload.check_in_time = Some("8:70".to_string());
        assert!(new_attendance(&payload).is_err());
    }

    #[test]
    fn attendance_employee_id_is_normalized() {
        let valid = new_attendance(&attendance_payload()).unwrap();
        assert_eq!(valid.employee_id, "EMP001");
        assert_eq!(valid.status, "Present");
    }

    #[test]
    fn notes_are_length_bounded() {
        let mut payload = attendance_payload();
        payload.notes = Some("x".repeat(501));
        assert!(new_attendance(&payload).is_err());
        payload.notes = Some("x".repeat(500));
        assert!(new_attendance(&payload).is_ok());
    }

    #[test]
    fn empty_update_is_detected() {
        let changes = employee_update(&UpdateEmployee {
            full_name: None,
            email: None,
            department: None,
            phone: None,
            position: None,
            salary: None,
            status: None,
        })
        .unwrap();
        assert!(changes.is_empty());
    }
}
