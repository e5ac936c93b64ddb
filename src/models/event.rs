use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::class::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EventType {
    Party,
    Gig,
    Absence,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RecurrencePeriod {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: EventType,
    pub title: String,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<Room>,
    pub teacher_id: Option<i64>,
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An event as returned by the calendar and event listings: joined with the
/// assigned teacher's display name. For a recurring event the expander emits
/// one of these per occurrence, `date` swapped for the occurrence date.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventView {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: EventType,
    pub title: String,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<Room>,
    pub teacher_id: Option<i64>,
    pub teacher_name: Option<String>,
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventRequest {
    #[serde(rename = "type")]
    pub kind: EventType,
    pub title: String,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<Room>,
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(rename = "type")]
    pub kind: Option<EventType>,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<Room>,
    pub teacher_id: Option<i64>,
    pub is_recurring: Option<bool>,
    pub recurrence_period: Option<RecurrencePeriod>,
    pub notes: Option<String>,
}
