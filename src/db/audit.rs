use sqlx::SqlitePool;

use crate::models::AuditEntry;

pub const AUDIT_PAGE_SIZE: i64 = 50;

pub async fn insert_entry(
    db: &SqlitePool,
    user_id: i64,
    action: &str,
    entity_type: &str,
    entity_id: i64,
    changes: &str,
    timestamp: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, entity_type, entity_id, changes, timestamp) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(changes)
    .bind(timestamp)
    .execute(db)
    .await?;
    Ok(())
}

/// One page of the audit log, newest first, joined with the acting user.
/// Pages are 1-based.
pub async fn fetch_page(db: &SqlitePool, page: i64) -> Result<Vec<AuditEntry>, sqlx::Error> {
    let offset = (page.max(1) - 1) * AUDIT_PAGE_SIZE;
    sqlx::query_as::<_, AuditEntry>(
        "SELECT a.id, a.user_id, u.display_name AS user_name, a.action, a.entity_type, \
         a.entity_id, a.changes, a.timestamp \
         FROM audit_log a INNER JOIN users u ON u.id = a.user_id \
         ORDER BY a.timestamp DESC LIMIT ? OFFSET ?",
    )
    .bind(AUDIT_PAGE_SIZE)
    .bind(offset)
    .fetch_all(db)
    .await
}
