use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only audit record. Written on a best-effort side channel and never
/// read back by the core logic.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    /// JSON payload, stored as text.
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
