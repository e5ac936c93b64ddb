use axum::{Json, extract::{Path, State}, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use crate::db;
use crate::error::AppError;
use crate::models::{ColorKeyword, NewColorKeywordRequest, UpdateColorKeywordRequest};
use crate::services::{audit, auth};
use crate::state::AppState;

pub async fn list_color_keywords(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<ColorKeyword>>, AppError> {
    auth::require_user(&state.db, &jar).await?;
    let keywords = db::color_keywords::fetch_color_keywords(&state.db).await?;
    Ok(Json(keywords))
}

pub async fn create_color_keyword(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<NewColorKeywordRequest>,
) -> Result<(StatusCode, Json<ColorKeyword>), AppError> {
    let acting = auth::require_owner(&state.db, &jar).await?;

    if req.keyword.trim().is_empty() || req.color.is_empty() {
        return Err(AppError::BadRequest(
            "Keyword and color are required".to_string(),
        ));
    }

    let created = db::color_keywords::insert_color_keyword(&state.db, &req).await?;

    audit::record(
        &state.db,
        acting.id,
        "create_color_keyword",
        "color_keyword",
        created.id,
        None,
        Some(audit::to_value(&created)),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_color_keyword(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<UpdateColorKeywordRequest>,
) -> Result<Json<ColorKeyword>, AppError> {
    let acting = auth::require_owner(&state.db, &jar).await?;

    let old = db::color_keywords::find_color_keyword(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let updated = db::color_keywords::update_color_keyword(&state.db, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    audit::record(
        &state.db,
        acting.id,
        "update_color_keyword",
        "color_keyword",
        id,
        Some(audit::to_value(&old)),
        Some(audit::to_value(&updated)),
    )
    .await?;

    Ok(Json(updated))
}

pub async fn delete_color_keyword(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let acting = auth::require_owner(&state.db, &jar).await?;

    let keyword = db::color_keywords::find_color_keyword(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::color_keywords::delete_color_keyword(&state.db, id).await?;

    audit::record(
        &state.db,
        acting.id,
        "delete_color_keyword",
        "color_keyword",
        id,
        Some(audit::to_value(&keyword)),
        None,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
