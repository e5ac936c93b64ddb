use axum::{Json, extract::{Path, State}, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use crate::db;
use crate::error::AppError;
use crate::models::{NewUserRequest, UpdateUserRequest, UserRole, UserView};
use crate::services::{audit, auth};
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<UserView>>, AppError> {
    auth::require_user(&state.db, &jar).await?;
    let users = db::users::fetch_users(&state.db).await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let acting = auth::require_owner(&state.db, &jar).await?;

    if req.username.is_empty() || req.password.is_empty() || req.display_name.is_empty() {
        return Err(AppError::BadRequest(
            "Username, password, and display name are required".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = db::users::insert_user(&state.db, &req, &password_hash).await?;

    audit::record(
        &state.db,
        acting.id,
        "create_user",
        "user",
        user.id,
        None,
        Some(json!({
            "username": user.username,
            "display_name": user.display_name,
            "role": user.role,
        })),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, AppError> {
    let acting = auth::require_owner(&state.db, &jar).await?;

    let old = db::users::find_user_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let password_hash = match req.password.as_deref() {
        Some(password) if !password.is_empty() => Some(auth::hash_password(password)?),
        _ => None,
    };

    let updated = db::users::update_user(&state.db, id, &req, password_hash.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;

    audit::record(
        &state.db,
        acting.id,
        "update_user",
        "user",
        id,
        Some(json!({ "display_name": old.display_name, "role": old.role })),
        Some(json!({ "display_name": updated.display_name, "role": updated.role })),
    )
    .await?;

    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let acting = auth::require_owner(&state.db, &jar).await?;

    let target = db::users::find_user_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if target.role == UserRole::Owner {
        return Err(AppError::BadRequest(
            "Cannot delete owner account".to_string(),
        ));
    }

    db::users::delete_user(&state.db, id).await?;

    audit::record(
        &state.db,
        acting.id,
        "delete_user",
        "user",
        id,
        Some(json!({ "username": target.username, "display_name": target.display_name })),
        None,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
