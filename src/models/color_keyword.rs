use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ColorKeyword {
    pub id: i64,
    pub keyword: String,
    pub color: String,
    pub priority: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewColorKeywordRequest {
    pub keyword: String,
    pub color: String,
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateColorKeywordRequest {
    pub keyword: Option<String>,
    pub color: Option<String>,
    pub priority: Option<i64>,
}
