use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewUserRequest, UpdateUserRequest, User, UserRole, UserView};

pub async fn fetch_users(db: &SqlitePool) -> Result<Vec<UserView>, sqlx::Error> {
    sqlx::query_as::<_, UserView>(
        "SELECT id, username, display_name, role, ical_token, created_at FROM users ORDER BY display_name",
    )
    .fetch_all(db)
    .await
}

pub async fn find_user_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, display_name, role, ical_token, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_user_by_username(
    db: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, display_name, role, ical_token, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

pub async fn find_user_by_ical_token(
    db: &SqlitePool,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, display_name, role, ical_token, created_at FROM users WHERE ical_token = ?",
    )
    .bind(token)
    .fetch_optional(db)
    .await
}

pub async fn owner_exists(db: &SqlitePool) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'owner'")
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}

pub async fn insert_user(
    db: &SqlitePool,
    req: &NewUserRequest,
    password_hash: &str,
) -> Result<UserView, sqlx::Error> {
    let role = req.role.unwrap_or(UserRole::Teacher);
    let ical_token = Uuid::new_v4().simple().to_string();
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, display_name, role, ical_token, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&req.username)
    .bind(password_hash)
    .bind(&req.display_name)
    .bind(role)
    .bind(&ical_token)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(UserView {
        id: result.last_insert_rowid(),
        username: req.username.clone(),
        display_name: req.display_name.clone(),
        role,
        ical_token,
        created_at: now,
    })
}

pub async fn update_user(
    db: &SqlitePool,
    id: i64,
    req: &UpdateUserRequest,
    password_hash: Option<&str>,
) -> Result<Option<UserView>, sqlx::Error> {
    let Some(mut current) = find_user_by_id(db, id).await? else {
        return Ok(None);
    };

    if let Some(display_name) = &req.display_name {
        current.display_name = display_name.clone();
    }
    if let Some(role) = req.role {
        current.role = role;
    }
    if let Some(hash) = password_hash {
        current.password_hash = hash.to_string();
    }

    sqlx::query("UPDATE users SET display_name = ?, role = ?, password_hash = ? WHERE id = ?")
        .bind(&current.display_name)
        .bind(current.role)
        .bind(&current.password_hash)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(UserView {
        id: current.id,
        username: current.username,
        display_name: current.display_name,
        role: current.role,
        ical_token: current.ical_token,
        created_at: current.created_at,
    }))
}

pub async fn delete_user(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
