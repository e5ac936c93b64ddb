pub mod audit;
pub mod auth;
pub mod calendar;
pub mod classes;
pub mod color_keywords;
pub mod events;
pub mod ical;
pub mod lessons;
pub mod users;

use axum::routing::{get, post, put};
use axum::{Router, extract::State, http::StatusCode};
use chrono::NaiveTime;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/api/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route(
            "/api/classes/{id}",
            get(classes::get_class)
                .put(classes::update_class)
                .delete(classes::delete_class),
        )
        .route("/api/lessons/{id}", put(lessons::update_lesson))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/calendar", get(calendar::query_calendar))
        .route(
            "/api/color-keywords",
            get(color_keywords::list_color_keywords).post(color_keywords::create_color_keyword),
        )
        .route(
            "/api/color-keywords/{id}",
            put(color_keywords::update_color_keyword)
                .delete(color_keywords::delete_color_keyword),
        )
        .route("/api/audit", get(audit::list_audit))
        .route("/api/ical/{token}", get(ical::feed))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// Cheap wall-clock format check for "HH:MM" strings arriving in requests.
pub(crate) fn validate_time(field: &str, value: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::BadRequest(format!("{field} must be HH:MM, got '{value}'")))
}
