use axum::{Json, extract::{Path, State}};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::api::validate_time;
use crate::db;
use crate::error::AppError;
use crate::models::{Lesson, UpdateLessonRequest};
use crate::services::{audit, auth};
use crate::state::AppState;

pub async fn update_lesson(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLessonRequest>,
) -> Result<Json<Lesson>, AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    let old = db::lessons::find_lesson(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(start_time) = &req.start_time {
        validate_time("start_time", start_time)?;
    }
    if let Some(end_time) = &req.end_time {
        validate_time("end_time", end_time)?;
    }

    let updated = db::lessons::update_lesson(&state.db, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    // A submitted override list replaces the existing one; an empty list
    // reverts the lesson to its class teachers.
    if let Some(overrides) = &req.teacher_overrides {
        db::lessons::replace_lesson_overrides(&state.db, id, overrides).await?;
    }

    let mut new_value = audit::to_value(&updated);
    if let (Value::Object(map), Some(overrides)) = (&mut new_value, &req.teacher_overrides) {
        map.insert("teacher_overrides".to_string(), audit::to_value(overrides));
    }

    audit::record(
        &state.db,
        acting.id,
        "update_lesson",
        "lesson",
        id,
        Some(audit::to_value(&old)),
        Some(new_value),
    )
    .await?;

    Ok(Json(updated))
}
