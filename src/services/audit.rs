use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value, json};
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;

/// Serializes a model for the audit trail; a serialization failure degrades
/// to null rather than failing the request.
pub fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Writes one audit log row for a create/update/delete action.
///
/// `create_*` actions store the new values under `_created`, `delete_*`
/// actions the old values under `_deleted`, everything else a per-field
/// old/new pair for the fields that actually changed.
pub async fn record(
    db: &SqlitePool,
    user_id: i64,
    action: &str,
    entity_type: &str,
    entity_id: i64,
    old_values: Option<Value>,
    new_values: Option<Value>,
) -> Result<(), AppError> {
    let changes = diff_changes(action, old_values, new_values);
    db::audit::insert_entry(
        db,
        user_id,
        action,
        entity_type,
        entity_id,
        &changes.to_string(),
        &Utc::now().to_rfc3339(),
    )
    .await?;
    Ok(())
}

fn diff_changes(action: &str, old_values: Option<Value>, new_values: Option<Value>) -> Value {
    if action.starts_with("create") {
        return json!({ "_created": { "old": null, "new": new_values } });
    }
    if action.starts_with("delete") {
        return json!({ "_deleted": { "old": old_values, "new": null } });
    }

    let mut changes = Map::new();
    if let (Some(Value::Object(old)), Some(Value::Object(new))) = (&old_values, &new_values) {
        for (key, new_value) in new {
            let old_value = old.get(key).unwrap_or(&Value::Null);
            if old_value != new_value {
                changes.insert(
                    key.clone(),
                    json!({ "old": old_value, "new": new_value }),
                );
            }
        }
    }
    Value::Object(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_actions_wrap_new_values() {
        let changes = diff_changes(
            "create_class",
            None,
            Some(json!({ "name": "Salsa beginners" })),
        );
        assert_eq!(
            changes,
            json!({ "_created": { "old": null, "new": { "name": "Salsa beginners" } } })
        );
    }

    #[test]
    fn delete_actions_wrap_old_values() {
        let changes = diff_changes("delete_event", Some(json!({ "title": "Gig" })), None);
        assert_eq!(
            changes,
            json!({ "_deleted": { "old": { "title": "Gig" }, "new": null } })
        );
    }

    #[test]
    fn updates_keep_only_changed_fields() {
        let changes = diff_changes(
            "update_class",
            Some(json!({ "name": "Salsa", "status": "planned", "room": "palomar" })),
            Some(json!({ "name": "Salsa", "status": "confirmed", "room": "palomar" })),
        );
        assert_eq!(
            changes,
            json!({ "status": { "old": "planned", "new": "confirmed" } })
        );
    }

    #[test]
    fn update_with_missing_side_diffs_nothing() {
        assert_eq!(diff_changes("update_lesson", None, None), json!({}));
    }
}
