use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::error;
use uuid::Uuid;

use crate::model::audit::AuditLogEntry;

/// Fire-and-forget audit write, invoked after the primary mutation has been
/// committed and acknowledged. Failures are logged and swallowed; they never
/// surface to the caller or roll back the primary operation.
pub fn record(pool: &SqlitePool, action: &str, entity_type: &str, entity_id: &str, details: Value) {
    let pool = pool.clone();
    let action = action.to_string();
    let entity_type = entity_type.to_string();
    let entity_id = entity_id.to_string();

    actix_web::rt::spawn(async move {
        if let Err(e) = write_entry(&pool, &action, &entity_type, &entity_id, &details).await {
            error!(
                error = %e,
                action = %action,
                entity_type = %entity_type,
                entity_id = %entity_id,
                "failed to write audit entry"
            );
        }
    });
}

pub async fn write_entry(
    pool: &SqlitePool,
    action: &str,
    entity_type: &str,
    entity_id: &str,
    details: &Value,
) -> Result<(), sqlx::Error> {
    let entry = AuditLogEntry {
        id: Uuid::new_v4().to_string(),
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_id: entity_id.to_string(),
        details: details.to_string(),
        timestamp: Utc::now(),
    };
    sqlx::query(
        "INSERT INTO audit_logs (id, action, entity_type, entity_id, details, timestamp) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&entry.id)
    .bind(&entry.action)
    .bind(&entry.entity_type)
    .bind(&entry.entity_id)
    .bind(&entry.details)
    .bind(entry.timestamp)
    .execute(pool)
    .await?;
    Ok(())
}
