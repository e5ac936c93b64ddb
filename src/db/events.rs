use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::{Event, EventView, NewEventRequest, UpdateEventRequest};

const EVENT_COLUMNS: &str = "id, type, title, date, end_date, start_time, end_time, room, \
                             teacher_id, is_recurring, recurrence_period, notes, created_at, updated_at";

const EVENT_VIEW_SELECT: &str =
    "SELECT e.id, e.type, e.title, e.date, e.end_date, e.start_time, e.end_time, e.room, \
     e.teacher_id, u.display_name AS teacher_name, e.is_recurring, e.recurrence_period, e.notes \
     FROM events e LEFT JOIN users u ON u.id = e.teacher_id";

pub async fn find_event(db: &SqlitePool, id: i64) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Event listing with optional date bounds, joined with the teacher name.
pub async fn fetch_events(
    db: &SqlitePool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<EventView>, sqlx::Error> {
    sqlx::query_as::<_, EventView>(&format!(
        "{EVENT_VIEW_SELECT} WHERE (? IS NULL OR e.date >= ?) AND (? IS NULL OR e.date <= ?) \
         ORDER BY e.date, e.start_time"
    ))
    .bind(start)
    .bind(start)
    .bind(end)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn non_recurring_in_range(
    db: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<EventView>, sqlx::Error> {
    sqlx::query_as::<_, EventView>(&format!(
        "{EVENT_VIEW_SELECT} WHERE e.is_recurring = 0 AND e.date >= ? AND e.date <= ?"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

/// Recurring events whose anchor date can still contribute occurrences to a
/// range ending at `end`; anchors after the range are filtered here.
pub async fn recurring_until(db: &SqlitePool, end: NaiveDate) -> Result<Vec<EventView>, sqlx::Error> {
    sqlx::query_as::<_, EventView>(&format!(
        "{EVENT_VIEW_SELECT} WHERE e.is_recurring = 1 AND e.date <= ?"
    ))
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn events_for_teacher_since(
    db: &SqlitePool,
    teacher_id: i64,
    cutoff: NaiveDate,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE teacher_id = ? AND date >= ? ORDER BY date"
    ))
    .bind(teacher_id)
    .bind(cutoff)
    .fetch_all(db)
    .await
}

pub async fn insert_event(db: &SqlitePool, req: &NewEventRequest) -> Result<Event, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO events (type, title, date, end_date, start_time, end_time, room, teacher_id, \
         is_recurring, recurrence_period, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(req.kind)
    .bind(&req.title)
    .bind(req.date)
    .bind(req.end_date)
    .bind(&req.start_time)
    .bind(&req.end_time)
    .bind(req.room)
    .bind(req.teacher_id)
    .bind(req.is_recurring)
    .bind(req.recurrence_period)
    .bind(&req.notes)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Event {
        id: result.last_insert_rowid(),
        kind: req.kind,
        title: req.title.clone(),
        date: req.date,
        end_date: req.end_date,
        start_time: req.start_time.clone(),
        end_time: req.end_time.clone(),
        room: req.room,
        teacher_id: req.teacher_id,
        is_recurring: req.is_recurring,
        recurrence_period: req.recurrence_period,
        notes: req.notes.clone(),
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_event(
    db: &SqlitePool,
    id: i64,
    req: &UpdateEventRequest,
) -> Result<Option<Event>, sqlx::Error> {
    let Some(mut current) = find_event(db, id).await? else {
        return Ok(None);
    };

    if let Some(kind) = req.kind {
        current.kind = kind;
    }
    if let Some(title) = &req.title {
        current.title = title.clone();
    }
    if let Some(date) = req.date {
        current.date = date;
    }
    if let Some(end_date) = req.end_date {
        current.end_date = Some(end_date);
    }
    if let Some(start_time) = &req.start_time {
        current.start_time = Some(start_time.clone());
    }
    if let Some(end_time) = &req.end_time {
        current.end_time = Some(end_time.clone());
    }
    if let Some(room) = req.room {
        current.room = Some(room);
    }
    if let Some(teacher_id) = req.teacher_id {
        current.teacher_id = Some(teacher_id);
    }
    if let Some(is_recurring) = req.is_recurring {
        current.is_recurring = is_recurring;
    }
    if let Some(period) = req.recurrence_period {
        current.recurrence_period = Some(period);
    }
    if let Some(notes) = &req.notes {
        current.notes = Some(notes.clone());
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE events SET type = ?, title = ?, date = ?, end_date = ?, start_time = ?, \
         end_time = ?, room = ?, teacher_id = ?, is_recurring = ?, recurrence_period = ?, \
         notes = ?, updated_at = ? WHERE id = ?",
    )
    .bind(current.kind)
    .bind(&current.title)
    .bind(current.date)
    .bind(current.end_date)
    .bind(&current.start_time)
    .bind(&current.end_time)
    .bind(current.room)
    .bind(current.teacher_id)
    .bind(current.is_recurring)
    .bind(current.recurrence_period)
    .bind(&current.notes)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_event(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
