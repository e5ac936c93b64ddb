use axum::{Json, extract::{Query, State}};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::db::{self, audit::AUDIT_PAGE_SIZE};
use crate::error::AppError;
use crate::models::AuditEntry;
use crate::services::auth;
use crate::state::AppState;

fn default_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

#[derive(Debug, Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    pub page: i64,
    pub limit: i64,
}

pub async fn list_audit(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditPage>, AppError> {
    auth::require_owner(&state.db, &jar).await?;

    let page = query.page.max(1);
    let entries = db::audit::fetch_page(&state.db, page).await?;

    Ok(Json(AuditPage {
        entries,
        page,
        limit: AUDIT_PAGE_SIZE,
    }))
}
