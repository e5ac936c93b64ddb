use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db;
use crate::error::AppError;
use crate::models::UserRole;
use crate::services::auth::{self, SESSION_COOKIE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub display_name: String,
    pub role: UserRole,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password required".to_string(),
        ));
    }

    let user = db::users::find_user_by_username(&state.db, &req.username)
        .await?
        .filter(|u| auth::verify_password(&req.password, &u.password_hash))
        .ok_or(AppError::Unauthorized)?;

    let session_id = auth::create_session(&state.db, user.id).await?;
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            user: SessionUser {
                id: user.id,
                display_name: user.display_name,
                role: user.role,
            },
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        auth::destroy_session(&state.db, cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::from(SESSION_COOKIE));
    Ok((jar, Json(json!({ "success": true }))))
}
