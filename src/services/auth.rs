use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::UserRole;

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_DAYS: i64 = 30;

/// The authenticated user attached to a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("password hashing failed: {}", e);
            AppError::InternalServerError
        })?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Creates a session row and returns its id for the cookie.
pub async fn create_session(db: &SqlitePool, user_id: i64) -> Result<String, AppError> {
    let session_id = Uuid::new_v4().simple().to_string();
    let expires_at = (Utc::now() + Duration::days(SESSION_DAYS)).to_rfc3339();
    db::sessions::insert_session(db, &session_id, user_id, &expires_at).await?;
    Ok(session_id)
}

pub async fn destroy_session(db: &SqlitePool, session_id: &str) -> Result<(), AppError> {
    db::sessions::delete_session(db, session_id).await?;
    Ok(())
}

/// Resolves the session cookie to a user. Expired sessions are deleted on
/// first touch.
pub async fn require_user(db: &SqlitePool, jar: &CookieJar) -> Result<AuthUser, AppError> {
    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let session = db::sessions::find_session(db, &session_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let expired = DateTime::parse_from_rfc3339(&session.expires_at)
        .map(|exp| exp < Utc::now())
        .unwrap_or(true);
    if expired {
        db::sessions::delete_session(db, &session_id).await?;
        return Err(AppError::Unauthorized);
    }

    let user = db::users::find_user_by_id(db, session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(AuthUser {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        role: user.role,
    })
}

/// Seeds the default owner account on first startup.
pub async fn ensure_owner(db: &SqlitePool) -> Result<(), AppError> {
    if db::users::owner_exists(db).await? {
        return Ok(());
    }
    let password_hash = hash_password("changeme")?;
    let req = crate::models::NewUserRequest {
        username: "admin".to_string(),
        password: String::new(),
        display_name: "Admin".to_string(),
        role: Some(UserRole::Owner),
    };
    db::users::insert_user(db, &req, &password_hash).await?;
    tracing::warn!("no owner account found, created 'admin' with password 'changeme'");
    Ok(())
}

/// Like [`require_user`] but only lets owners through.
pub async fn require_owner(db: &SqlitePool, jar: &CookieJar) -> Result<AuthUser, AppError> {
    let user = require_user(db, jar).await?;
    if !user.is_owner() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("cha-cha-cha").expect("hashing succeeds");
        assert!(verify_password("cha-cha-cha", &hash));
        assert!(!verify_password("waltz", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").expect("hashing succeeds");
        let b = hash_password("same").expect("hashing succeeds");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
