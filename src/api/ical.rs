use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::db;
use crate::error::AppError;
use crate::services::ical;
use crate::state::AppState;

/// Unauthenticated per-teacher feed; the token in the URL is the secret.
pub async fn feed(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    let user = db::users::find_user_by_ical_token(&state.db, &token)
        .await?
        .ok_or(AppError::NotFound)?;

    let body = ical::build_teacher_feed(&state.db, &user).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"calendar.ics\"",
            ),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response())
}
