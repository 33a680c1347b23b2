use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use utoipa::ToSchema;

use crate::config::Config;

/// Process-wide pool, built once at startup. Acquisition and busy-handler
/// timeouts are bounded so a wedged store surfaces as an error instead of a
/// hang. Referential integrity between attendance and employees is enforced
/// at write time, not by the engine.
pub async fn init_db(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    setup_schema(&pool).await?;

    Ok(pool)
}

/// The unique indexes are the source of truth for uniqueness; store-level
/// existence pre-checks only improve error messages.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id TEXT NOT NULL,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL,
        department TEXT NOT NULL,
        phone TEXT,
        position TEXT,
        hire_date TEXT,
        salary REAL,
        status TEXT NOT NULL DEFAULT 'Active',
        created_at TEXT NOT NULL,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id TEXT NOT NULL,
        date TEXT NOT NULL,
        status TEXT NOT NULL,
        check_in_time TEXT,
        check_out_time TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS audit_logs (
        id TEXT PRIMARY KEY,
        action TEXT NOT NULL,
        entity_type TEXT NOT NULL,
        entity_id TEXT NOT NULL,
        details TEXT NOT NULL,
        timestamp TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_employees_employee_id ON employees(employee_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_employees_email ON employees(email)",
    "CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department)",
    "CREATE INDEX IF NOT EXISTS idx_employees_created_at ON employees(created_at)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_employee_date ON attendance(employee_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_status ON attendance(status)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_created_at ON attendance(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_timestamp ON audit_logs(timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_action ON audit_logs(action)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_entity_type ON audit_logs(entity_type)",
];

pub async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreStats {
    pub employees: i64,
    pub attendance_records: i64,
    pub audit_entries: i64,
    pub data_size: i64,
}

/// Basic store statistics for the health endpoint.
pub async fn store_stats(pool: &SqlitePool) -> Result<StoreStats, sqlx::Error> {
    let employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    let attendance_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(pool)
        .await?;
    let audit_entries = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_logs")
        .fetch_one(pool)
        .await?;
    let page_count = sqlx::query_scalar::<_, i64>("PRAGMA page_count")
        .fetch_one(pool)
        .await?;
    let page_size = sqlx::query_scalar::<_, i64>("PRAGMA page_size")
        .fetch_one(pool)
        .await?;

    Ok(StoreStats {
        employees,
        attendance_records,
        audit_entries,
        data_size: page_count * page_size,
    })
}
