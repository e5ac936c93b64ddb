use axum::{Json, extract::{Path, Query, State}, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::validate_time;
use crate::db;
use crate::error::AppError;
use crate::models::{Event, EventView, NewEventRequest, UpdateEventRequest};
use crate::services::{audit, auth};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub async fn list_events(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(range): Query<EventRangeQuery>,
) -> Result<Json<Vec<EventView>>, AppError> {
    auth::require_user(&state.db, &jar).await?;
    let events = db::events::fetch_events(&state.db, range.start, range.end).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<NewEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    if req.title.is_empty() {
        return Err(AppError::BadRequest(
            "Type, title, and date are required".to_string(),
        ));
    }
    if let Some(start_time) = &req.start_time {
        validate_time("start_time", start_time)?;
    }
    if let Some(end_time) = &req.end_time {
        validate_time("end_time", end_time)?;
    }

    let event = db::events::insert_event(&state.db, &req).await?;

    audit::record(
        &state.db,
        acting.id,
        "create_event",
        "event",
        event.id,
        None,
        Some(audit::to_value(&req)),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Event>, AppError> {
    auth::require_user(&state.db, &jar).await?;
    let event = db::events::find_event(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    let old = db::events::find_event(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(start_time) = &req.start_time {
        validate_time("start_time", start_time)?;
    }
    if let Some(end_time) = &req.end_time {
        validate_time("end_time", end_time)?;
    }

    let updated = db::events::update_event(&state.db, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    audit::record(
        &state.db,
        acting.id,
        "update_event",
        "event",
        id,
        Some(audit::to_value(&old)),
        Some(audit::to_value(&updated)),
    )
    .await?;

    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let acting = auth::require_user(&state.db, &jar).await?;

    let event = db::events::find_event(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::events::delete_event(&state.db, id).await?;

    audit::record(
        &state.db,
        acting.id,
        "delete_event",
        "event",
        id,
        Some(audit::to_value(&event)),
        None,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
