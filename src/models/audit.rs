use serde::Serialize;
use sqlx::FromRow;

/// One audit log row joined with the acting user's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub changes: String,
    pub timestamp: String,
}
