//! Database seeding binary: sample employees plus ~30 days of randomized
//! attendance, mirroring what a small single-organization deployment looks
//! like.

use anyhow::Result;
use chrono::{Datelike, Duration, Local};
use rand::Rng;
use sqlx::SqlitePool;

use hrms_lite::config::Config;
use hrms_lite::db::init_db;
use hrms_lite::model::attendance::MarkAttendance;
use hrms_lite::model::employee::CreateEmployee;
use hrms_lite::store;
use hrms_lite::utils::validate;

const SAMPLE_EMPLOYEES: &[(&str, &str, &str, &str, &str, &str, &str, f64)] = &[
    (
        "EMP001",
        "Arjun Sharma",
        "arjun.sharma@company.com",
        "Engineering",
        "+91-98765-43201",
        "Senior Developer",
        "2023-01-15",
        85000.0,
    ),
    (
        "EMP002",
        "Kavya Reddy",
        "kavya.reddy@company.com",
        "Marketing",
        "+91-98765-43202",
        "Marketing Manager",
        "2023-02-20",
        75000.0,
    ),
    (
        "EMP003",
        "Vikram Singh",
        "vikram.singh@company.com",
        "Engineering",
        "+91-98765-43203",
        "Frontend Developer",
        "2023-03-10",
        70000.0,
    ),
    (
        "EMP004",
        "Ananya Iyer",
        "ananya.iyer@company.com",
        "HR",
        "+91-98765-43204",
        "HR Specialist",
        "2023-04-05",
        60000.0,
    ),
    (
        "EMP005",
        "Rajesh Kumar",
        "rajesh.kumar@company.com",
        "Sales",
        "+91-98765-43205",
        "Sales Representative",
        "2023-05-12",
        55000.0,
    ),
    (
        "EMP006",
        "Priya Sharma",
        "priya.sharma@company.com",
        "Finance",
        "+91-98765-43206",
        "Financial Analyst",
        "2023-06-18",
        65000.0,
    ),
    (
        "EMP007",
        "Amit Patel",
        "amit.patel@company.com",
        "Engineering",
        "+91-98765-43207",
        "DevOps Engineer",
        "2023-07-22",
        80000.0,
    ),
    (
        "EMP008",
        "Sneha Gupta",
        "sneha.gupta@company.com",
        "Marketing",
        "+91-98765-43208",
        "Content Specialist",
        "2023-08-14",
        50000.0,
    ),
];

#[actix_web::main]
async fn main() -> Result<()> {
    println!("Starting database seeding...");

    let config = Config::from_env();
    let pool = init_db(&config).await?;

    clear_database(&pool).await?;
    create_sample_employees(&pool).await?;
    let attendance_count = create_attendance_records(&pool).await?;

    let employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(&pool)
        .await?;
    let departments =
        sqlx::query_scalar::<_, String>("SELECT DISTINCT department FROM employees ORDER BY department")
            .fetch_all(&pool)
            .await?;

    println!("\nDatabase Summary:");
    println!("   Employees: {}", employees);
    println!("   Attendance Records: {}", attendance_count);
    println!(
        "   Departments: {} ({})",
        departments.len(),
        departments.join(", ")
    );
    println!("\nDatabase seeding completed successfully!");

    Ok(())
}

async fn clear_database(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM attendance").execute(pool).await?;
    sqlx::query("DELETE FROM employees").execute(pool).await?;
    println!("Database cleared");
    Ok(())
}

async fn create_sample_employees(pool: &SqlitePool) -> Result<()> {
    for (employee_id, full_name, email, department, phone, position, hire_date, salary) in
        SAMPLE_EMPLOYEES
    {
        let payload = CreateEmployee {
            employee_id: employee_id.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
            phone: Some(phone.to_string()),
            position: Some(position.to_string()),
            hire_date: Some(hire_date.to_string()),
            salary: Some(*salary),
            status: "Active".to_string(),
        };
        store::employee::create(pool, validate::new_employee(&payload)?).await?;
    }
    println!("Created {} employees", SAMPLE_EMPLOYEES.len());
    Ok(())
}

/// Weekday attendance for the last 30 days: ~90% presence, check-in between
/// 08:00 and 09:30, check-out between 17:00 and 19:59, late after 09:00.
async fn create_attendance_records(pool: &SqlitePool) -> Result<u32> {
    let end_date = Local::now().date_naive();
    let start_date = end_date - Duration::days(30);
    let mut rng = rand::thread_rng();

    let mut count = 0u32;
    let mut current = start_date;
    while current <= end_date {
        if current.weekday().number_from_monday() <= 5 {
            for (employee_id, ..) in SAMPLE_EMPLOYEES {
                let (status, check_in_time, check_out_time) = if rng.gen_bool(0.9) {
                    let in_hour: u32 = rng.gen_range(8..=9);
                    let in_minute: u32 = if in_hour == 8 {
                        rng.gen_range(0..=59)
                    } else {
                        rng.gen_range(0..=30)
                    };
                    let out_hour: u32 = rng.gen_range(17..=19);
                    let out_minute: u32 = rng.gen_range(0..=59);

                    let status = if in_hour > 9 || (in_hour == 9 && in_minute > 0) {
                        "Late"
                    } else {
                        "Present"
                    };
                    (
                        status,
                        Some(format!("{:02}:{:02}", in_hour, in_minute)),
                        Some(format!("{:02}:{:02}", out_hour, out_minute)),
                    )
                } else {
                    ("Absent", None, None)
                };

                let payload = MarkAttendance {
                    employee_id: employee_id.to_string(),
                    date: current.format("%Y-%m-%d").to_string(),
                    status: status.to_string(),
                    check_in_time,
                    check_out_time,
                    notes: None,
                };
                store::attendance::mark_or_update(pool, validate::new_attendance(&payload)?)
                    .await?;
                count += 1;
            }
        }
        current += Duration::days(1);
    }

    println!("Created {} attendance records", count);
    Ok(count)
}
