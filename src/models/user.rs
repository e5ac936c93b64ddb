use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Teacher,
}

/// Full user row, password hash included. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: UserRole,
    pub ical_token: String,
    pub created_at: String,
}

/// What the users API returns: everything except the password hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
    pub ical_token: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}
