use axum::{Json, extract::{Path, State}, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use crate::api::validate_time;
use crate::db;
use crate::error::AppError;
use crate::models::{
    ClassType, ClassWithTeachers, DanceClass, LessonWithTeachers, NewClassRequest,
    UpdateClassRequest,
};
use crate::schedule;
use crate::services::{audit, auth, colors};
use crate::state::AppState;

const DEFAULT_CLASS_COLOR: &str = "#4A90D9";

pub async fn list_classes(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<ClassWithTeachers>>, AppError> {
    auth::require_user(&state.db, &jar).await?;

    let classes = db::classes::fetch_classes(&state.db).await?;
    let mut result = Vec::with_capacity(classes.len());
    for class in classes {
        let teachers = db::classes::fetch_class_teachers(&state.db, class.id).await?;
        result.push(ClassWithTeachers {
            class,
            teachers,
            lessons: Vec::new(),
        });
    }
    Ok(Json(result))
}

pub async fn create_class(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<NewClassRequest>,
) -> Result<(StatusCode, Json<DanceClass>), AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    if req.name.is_empty() {
        return Err(AppError::BadRequest("Class name is required".to_string()));
    }
    if req.kind == ClassType::Social && req.teachers.len() < 2 {
        return Err(AppError::BadRequest(
            "Social class requires leader and follower teachers".to_string(),
        ));
    }
    for pattern in &req.patterns {
        validate_time("pattern start_time", &pattern.start_time)?;
        validate_time("pattern end_time", &pattern.end_time)?;
    }

    let total_lessons = req.total_lessons.unwrap_or(6);
    let lessons = schedule::generate(total_lessons, req.first_date, &req.patterns, req.room)?;

    // Auto-color by name from the keyword table when no color was supplied.
    let color = match &req.color {
        Some(color) => color.clone(),
        None => {
            let keywords = db::color_keywords::fetch_color_keywords(&state.db).await?;
            colors::resolve_keyword_color(&req.name, &keywords)
                .unwrap_or(DEFAULT_CLASS_COLOR)
                .to_string()
        }
    };

    let class = db::classes::create_class_with_lessons(&state.db, &req, &color, &lessons).await?;

    audit::record(
        &state.db,
        acting.id,
        "create_class",
        "class",
        class.id,
        None,
        Some(json!({
            "name": req.name,
            "type": req.kind,
            "room": req.room,
            "total_lessons": total_lessons,
            "teachers": req.teachers,
            "first_date": req.first_date,
            "patterns": req.patterns,
        })),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn get_class(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<ClassWithTeachers>, AppError> {
    auth::require_user(&state.db, &jar).await?;

    let class = db::classes::find_class(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let teachers = db::classes::fetch_class_teachers(&state.db, id).await?;

    let mut lessons = Vec::new();
    for lesson in db::lessons::fetch_class_lessons(&state.db, id).await? {
        let overrides = db::lessons::fetch_lesson_override_views(&state.db, lesson.id).await?;
        let has_override = !overrides.is_empty();
        lessons.push(LessonWithTeachers {
            lesson,
            teachers: if has_override {
                overrides
            } else {
                teachers.clone()
            },
            has_override,
        });
    }

    Ok(Json(ClassWithTeachers {
        class,
        teachers,
        lessons,
    }))
}

pub async fn update_class(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<DanceClass>, AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    let old = db::classes::find_class(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let updated = db::classes::update_class(&state.db, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(teachers) = &req.teachers {
        db::classes::replace_class_teachers(&state.db, id, teachers).await?;
    }

    audit::record(
        &state.db,
        acting.id,
        "update_class",
        "class",
        id,
        Some(audit::to_value(&old)),
        Some(audit::to_value(&updated)),
    )
    .await?;

    Ok(Json(updated))
}

pub async fn delete_class(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    let class = db::classes::find_class(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::classes::delete_class(&state.db, id).await?;

    audit::record(
        &state.db,
        acting.id,
        "delete_class",
        "class",
        id,
        Some(audit::to_value(&class)),
        None,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
