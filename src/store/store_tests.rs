use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db;
use crate::error::ApiError;
use crate::model::attendance::MarkAttendance;
use crate::model::employee::{CreateEmployee, UpdateEmployee};
use crate::store::attendance::{self, AttendanceFilter};
use crate::store::audit;
use crate::store::employee::{self, EmployeeFilter};
use crate::utils::validate;

async fn setup(pool: &SqlitePool) {
    db::setup_schema(pool).await.expect("schema setup failed");
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn employee_payload(employee_id: &str, full_name: &str, email: &str) -> CreateEmployee {
    CreateEmployee {
        employee_id: employee_id.to_string(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        department: "Engineering".to_string(),
        phone: None,
        position: None,
        hire_date: Some("2023-01-15".to_string()),
        salary: Some(70000.0),
        status: "Active".to_string(),
    }
}

async fn create_employee(pool: &SqlitePool, employee_id: &str, full_name: &str, email: &str) {
    let valid = validate::new_employee(&employee_payload(employee_id, full_name, email)).unwrap();
    employee::create(pool, valid).await.unwrap();
}

fn mark_payload(
    employee_id: &str,
    day: &str,
    status: &str,
    check_in: Option<&str>,
    check_out: Option<&str>,
) -> MarkAttendance {
    MarkAttendance {
        employee_id: employee_id.to_string(),
        date: day.to_string(),
        status: status.to_string(),
        check_in_time: check_in.map(str::to_string),
        check_out_time: check_out.map(str::to_string),
        notes: None,
    }
}

async fn mark(
    pool: &SqlitePool,
    employee_id: &str,
    day: &str,
    status: &str,
    check_in: Option<&str>,
    check_out: Option<&str>,
) {
    let valid =
        validate::new_attendance(&mark_payload(employee_id, day, status, check_in, check_out))
            .unwrap();
    attendance::mark_or_update(pool, valid).await.unwrap();
}

#[sqlx::test]
async fn create_round_trips_normalized_fields(pool: SqlitePool) {
    setup(&pool).await;
    let valid =
        validate::new_employee(&employee_payload("emp001", "arjun sharma", "arjun@company.com"))
            .unwrap();
    let created = employee::create(&pool, valid).await.unwrap();

    assert_eq!(created.employee_id, "EMP001");
    assert_eq!(created.full_name, "Arjun Sharma");
    assert_eq!(created.status, "Active");
    assert!(created.updated_at.is_none());

    // Lookups normalize the business key the same way writes do.
    let fetched = employee::get(&pool, "emp001").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.created_at, created.created_at);
}

#[sqlx::test]
async fn duplicate_employee_id_and_email_conflict(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;

    let same_id =
        validate::new_employee(&employee_payload("emp001", "Someone Else", "other@company.com"))
            .unwrap();
    let err = employee::create(&pool, same_id).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {:?}", err);

    let same_email =
        validate::new_employee(&employee_payload("EMP002", "Someone Else", "arjun@company.com"))
            .unwrap();
    let err = employee::create(&pool, same_email).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {:?}", err);
}

#[sqlx::test]
async fn concurrent_creates_race_to_one_winner(pool: SqlitePool) {
    setup(&pool).await;
    let first =
        validate::new_employee(&employee_payload("EMP100", "First Racer", "first@company.com"))
            .unwrap();
    let second =
        validate::new_employee(&employee_payload("emp100", "Second Racer", "second@company.com"))
            .unwrap();

    let (r1, r2) = futures::join!(
        employee::create(&pool, first),
        employee::create(&pool, second)
    );

    assert!(
        r1.is_ok() != r2.is_ok(),
        "exactly one create must win: {:?} / {:?}",
        r1.is_err(),
        r2.is_err()
    );
    let err = if r1.is_ok() {
        r2.unwrap_err()
    } else {
        r1.unwrap_err()
    };
    assert!(matches!(err, ApiError::Conflict(_)), "got {:?}", err);

    let (rows, total) = employee::list(&pool, &EmployeeFilter::default(), 0, 100)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_id, "EMP100");
}

#[sqlx::test]
async fn update_applies_partial_fields_and_stamps(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;

    let changes = validate::employee_update(&UpdateEmployee {
        full_name: None,
        email: None,
        department: Some("platform engineering".to_string()),
        phone: Some("+91-98765-43201".to_string()),
        position: None,
        salary: None,
        status: None,
    })
    .unwrap();
    let updated = employee::update(&pool, "EMP001", changes).await.unwrap();

    assert_eq!(updated.department, "Platform Engineering");
    assert_eq!(updated.phone.as_deref(), Some("+91-98765-43201"));
    assert_eq!(updated.full_name, "Arjun Sharma");
    assert_eq!(updated.email, "arjun@company.com");
    assert!(updated.updated_at.is_some());
}

#[sqlx::test]
async fn update_email_rechecks_uniqueness_against_others(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;
    create_employee(&pool, "EMP002", "Kavya Reddy", "kavya@company.com").await;

    let steal = validate::employee_update(&UpdateEmployee {
        full_name: None,
        email: Some("arjun@company.com".to_string()),
        department: None,
        phone: None,
        position: None,
        salary: None,
        status: None,
    })
    .unwrap();
    let err = employee::update(&pool, "EMP002", steal).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {:?}", err);

    // Re-submitting your own email is not a conflict.
    let own = validate::employee_update(&UpdateEmployee {
        full_name: None,
        email: Some("kavya@company.com".to_string()),
        department: None,
        phone: None,
        position: None,
        salary: None,
        status: None,
    })
    .unwrap();
    assert!(employee::update(&pool, "EMP002", own).await.is_ok());
}

#[sqlx::test]
async fn empty_update_is_a_no_op(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;

    let changes = validate::employee_update(&UpdateEmployee {
        full_name: None,
        email: None,
        department: None,
        phone: None,
        position: None,
        salary: None,
        status: None,
    })
    .unwrap();
    let unchanged = employee::update(&pool, "EMP001", changes).await.unwrap();
    assert!(unchanged.updated_at.is_none());
}

#[sqlx::test]
async fn delete_cascades_attendance(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;
    mark(&pool, "EMP001", "2025-03-03", "Present", Some("09:00"), Some("17:00")).await;
    mark(&pool, "EMP001", "2025-03-04", "Absent", None, None).await;

    let (deleted, cascaded) = employee::delete(&pool, "EMP001").await.unwrap();
    assert_eq!(deleted.employee_id, "EMP001");
    assert_eq!(cascaded, 2);

    let err = employee::get(&pool, "EMP001").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test]
async fn delete_unknown_employee_is_not_found(pool: SqlitePool) {
    setup(&pool).await;
    let err = employee::delete(&pool, "EMP404").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
}

#[sqlx::test]
async fn remarking_same_day_upserts_and_preserves_created_at(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;

    let first = validate::new_attendance(&mark_payload(
        "EMP001",
        "2025-03-03",
        "Present",
        Some("09:00"),
        Some("17:00"),
    ))
    .unwrap();
    let (first_row, created) = attendance::mark_or_update(&pool, first).await.unwrap();
    assert!(created);
    assert!(first_row.updated_at.is_none());

    let second = validate::new_attendance(&mark_payload(
        "EMP001",
        "2025-03-03",
        "Late",
        Some("09:45"),
        Some("18:00"),
    ))
    .unwrap();
    let (second_row, created) = attendance::mark_or_update(&pool, second).await.unwrap();
    assert!(!created);
    assert_eq!(second_row.id, first_row.id);
    assert_eq!(second_row.status, "Late");
    assert_eq!(second_row.check_in_time.as_deref(), Some("09:45"));
    assert_eq!(second_row.created_at, first_row.created_at);
    assert!(second_row.updated_at.is_some());
    assert_eq!(second_row.working_hours, Some(8.25));

    let stored = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[sqlx::test]
async fn marking_for_unknown_employee_is_not_found(pool: SqlitePool) {
    setup(&pool).await;
    let valid = validate::new_attendance(&mark_payload(
        "EMP404",
        "2025-03-03",
        "Present",
        None,
        None,
    ))
    .unwrap();
    let err = attendance::mark_or_update(&pool, valid).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
}

#[sqlx::test]
async fn free_text_search_is_case_insensitive_over_name_id_email(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun.sharma@company.com").await;
    create_employee(&pool, "EMP002", "Kavya Reddy", "kavya.reddy@company.com").await;

    let by_name = EmployeeFilter {
        search: Some("ARJUN".to_string()),
        ..Default::default()
    };
    let (rows, total) = employee::list(&pool, &by_name, 0, 100).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].employee_id, "EMP001");

    let by_id = EmployeeFilter {
        search: Some("emp0".to_string()),
        ..Default::default()
    };
    let (_, total) = employee::list(&pool, &by_id, 0, 100).await.unwrap();
    assert_eq!(total, 2);

    let by_email = EmployeeFilter {
        search: Some("reddy@COMPANY".to_string()),
        ..Default::default()
    };
    let (rows, total) = employee::list(&pool, &by_email, 0, 100).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].employee_id, "EMP002");
}

#[sqlx::test]
async fn department_filter_matches_substring_case_insensitively(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;
    let mut marketing = employee_payload("EMP002", "Kavya Reddy", "kavya@company.com");
    marketing.department = "Marketing".to_string();
    employee::create(&pool, validate::new_employee(&marketing).unwrap())
        .await
        .unwrap();

    let filter = EmployeeFilter {
        department: Some("engineer".to_string()),
        ..Default::default()
    };
    let (rows, total) = employee::list(&pool, &filter, 0, 100).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].department, "Engineering");
}

#[sqlx::test]
async fn listing_is_paginated_newest_first(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;
    create_employee(&pool, "EMP002", "Kavya Reddy", "kavya@company.com").await;
    create_employee(&pool, "EMP003", "Vikram Singh", "vikram@company.com").await;

    let (page, total) = employee::list(&pool, &EmployeeFilter::default(), 0, 2)
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].employee_id, "EMP003");

    let (rest, _) = employee::list(&pool, &EmployeeFilter::default(), 2, 2)
        .await
        .unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].employee_id, "EMP001");
}

#[sqlx::test]
async fn attendance_list_filters_and_sorts(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;
    create_employee(&pool, "EMP002", "Kavya Reddy", "kavya@company.com").await;
    mark(&pool, "EMP001", "2025-03-03", "Present", Some("09:00"), Some("17:00")).await;
    mark(&pool, "EMP002", "2025-03-03", "Late", Some("09:30"), Some("17:30")).await;
    mark(&pool, "EMP001", "2025-03-04", "Absent", None, None).await;

    let (rows, total) = attendance::list(&pool, &AttendanceFilter::default(), 0, 100)
        .await
        .unwrap();
    assert_eq!(total, 3);
    // date descending, then employee_id ascending
    assert_eq!(rows[0].date, date("2025-03-04"));
    assert_eq!(rows[1].employee_id, "EMP001");
    assert_eq!(rows[2].employee_id, "EMP002");
    assert_eq!(rows[1].working_hours, Some(8.0));
    assert_eq!(rows[0].working_hours, None);
    assert_eq!(rows[1].employee_name, "Arjun Sharma");

    let by_status = AttendanceFilter {
        status: Some("Late".to_string()),
        ..Default::default()
    };
    let (rows, total) = attendance::list(&pool, &by_status, 0, 100).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].employee_id, "EMP002");

    let in_range = AttendanceFilter {
        date_from: Some(date("2025-03-04")),
        ..Default::default()
    };
    let (_, total) = attendance::list(&pool, &in_range, 0, 100).await.unwrap();
    assert_eq!(total, 1);
}

#[sqlx::test]
async fn orphaned_attendance_degrades_to_unknown_employee(pool: SqlitePool) {
    setup(&pool).await;
    // A pre-existing orphan: its employee row is already gone.
    sqlx::query(
        "INSERT INTO attendance (employee_id, date, status, created_at) \
         VALUES ('GHOST', '2025-03-03', 'Present', ?)",
    )
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    let (rows, total) = attendance::list(&pool, &AttendanceFilter::default(), 0, 100)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].employee_name, "Unknown Employee");
}

#[sqlx::test]
async fn for_employee_respects_range_and_order(pool: SqlitePool) {
    setup(&pool).await;
    create_employee(&pool, "EMP001", "Arjun Sharma", "arjun@company.com").await;
    mark(&pool, "EMP001", "2025-03-03", "Present", Some("09:00"), Some("17:00")).await;
    mark(&pool, "EMP001", "2025-03-05", "Present", Some("09:00"), Some("17:00")).await;
    mark(&pool, "EMP001", "2025-03-10", "Absent", None, None).await;

    let rows = attendance::for_employee(
        &pool,
        "emp001",
        Some(date("2025-03-01")),
        Some(date("2025-03-07")),
        100,
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, date("2025-03-05"));
    assert_eq!(rows[1].date, date("2025-03-03"));

    let err = attendance::for_employee(&pool, "EMP404", None, None, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[sqlx::test]
async fn audit_entries_are_persisted_with_details(pool: SqlitePool) {
    setup(&pool).await;
    audit::write_entry(
        &pool,
        "CREATE",
        "employee",
        "EMP001",
        &serde_json::json!({"employee_id": "EMP001"}),
    )
    .await
    .unwrap();

    let (action, details) = sqlx::query_as::<_, (String, String)>(
        "SELECT action, details FROM audit_logs WHERE entity_id = 'EMP001'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(action, "CREATE");
    let details: serde_json::Value = serde_json::from_str(&details).unwrap();
    assert_eq!(details["employee_id"], "EMP001");
}

#[sqlx::test]
async fn audit_write_failure_is_reported_not_panicked(pool: SqlitePool) {
    // No schema set up: the insert must fail with an error the caller can
    // swallow, never a panic.
    let result = audit::write_entry(
        &pool,
        "CREATE",
        "employee",
        "EMP001",
        &serde_json::json!({}),
    )
    .await;
    assert!(result.is_err());
}
