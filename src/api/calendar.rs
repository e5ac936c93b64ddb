use std::collections::HashMap;

use axum::{Json, extract::{Query, State}};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::AppError;
use crate::models::{CalendarLesson, EventView, TeacherView};
use crate::schedule;
use crate::services::auth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub lessons: Vec<CalendarLesson>,
    pub events: Vec<EventView>,
}

/// One calendar page: lessons joined with class and teachers, plus events
/// with their recurrences expanded into the queried range.
pub async fn query_calendar(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    auth::require_user(&state.db, &jar).await?;

    let (start, end) = match (query.start, query.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(
                "start and end query params required (YYYY-MM-DD)".to_string(),
            ));
        }
    };

    let mut lessons = db::lessons::lessons_in_range(&state.db, start, end).await?;

    // Effective teachers per lesson: overrides win, otherwise the class
    // assignment (cached per class, the same classes repeat week to week).
    let mut class_teachers: HashMap<i64, Vec<TeacherView>> = HashMap::new();
    for lesson in &mut lessons {
        let overrides = db::lessons::fetch_lesson_override_views(&state.db, lesson.id).await?;
        if !overrides.is_empty() {
            lesson.teachers = overrides;
            continue;
        }
        if !class_teachers.contains_key(&lesson.class_id) {
            let teachers = db::classes::fetch_class_teachers(&state.db, lesson.class_id).await?;
            class_teachers.insert(lesson.class_id, teachers);
        }
        lesson.teachers = class_teachers
            .get(&lesson.class_id)
            .cloned()
            .unwrap_or_default();
    }

    let non_recurring = db::events::non_recurring_in_range(&state.db, start, end).await?;
    let recurring = db::events::recurring_until(&state.db, end).await?;
    let events = schedule::expand(start, end, non_recurring, recurring);

    Ok(Json(CalendarResponse { lessons, events }))
}
