use chrono::{Days, Local, NaiveDateTime, NaiveTime};
#[cfg(test)]
use chrono::NaiveDate;
use icalendar::{Calendar, Component, Event as CalEvent, EventLike};
use sqlx::SqlitePool;
use tracing::warn;

use crate::db;
use crate::error::AppError;
use crate::models::{ClassStatus, Lesson, User};

/// How far back the feed reaches.
const FEED_CUTOFF_DAYS: u64 = 30;

/// Builds the iCalendar feed for one teacher: their non-cancelled lessons
/// (respecting per-lesson overrides in both directions) plus their own
/// events, from 30 days ago onward.
pub async fn build_teacher_feed(db: &SqlitePool, user: &User) -> Result<String, AppError> {
    let cutoff = Local::now().date_naive() - Days::new(FEED_CUTOFF_DAYS);

    let mut calendar = Calendar::new();
    calendar.name(&format!("Tabby Calendar - {}", user.display_name));

    // Lessons from classes this teacher is assigned to. An override on a
    // lesson replaces the class assignment entirely, so the teacher drops
    // out unless the override names them again.
    let class_ids = db::classes::class_ids_for_teacher(db, user.id).await?;
    for class_id in &class_ids {
        let Some(class) = db::classes::find_class(db, *class_id).await? else {
            continue;
        };

        for lesson in db::lessons::lessons_for_class_since(db, *class_id, cutoff).await? {
            let override_ids = db::lessons::fetch_override_teacher_ids(db, lesson.id).await?;
            if !override_ids.is_empty() && !override_ids.contains(&user.id) {
                continue;
            }
            if lesson.is_cancelled {
                continue;
            }
            let Some((start, end)) = lesson_times(&lesson) else {
                continue;
            };

            let summary = format!(
                "{} ({}/{})",
                class.name, lesson.lesson_number, class.total_lessons
            );
            let status_line = match class.status {
                ClassStatus::Planned => Some("Status: Planned"),
                ClassStatus::Confirmed => Some("Status: Confirmed"),
                ClassStatus::Cancelled => None,
            };
            let description: Vec<&str> = lesson
                .notes
                .as_deref()
                .into_iter()
                .chain(status_line)
                .collect();

            let mut event = CalEvent::new();
            event
                .uid(&format!("lesson-{}@tabby-calendar", lesson.id))
                .summary(&summary)
                .location(lesson.room.label())
                .starts(start)
                .ends(end);
            if !description.is_empty() {
                event.description(&description.join("\n"));
            }
            calendar.push(event.done());
        }
    }

    // Substitution assignments: lessons where an override names this teacher
    // on a class that is not theirs.
    for lesson_id in db::lessons::lesson_ids_overridden_to(db, user.id).await? {
        let Some(lesson) = db::lessons::find_lesson(db, lesson_id).await? else {
            continue;
        };
        if lesson.date < cutoff || lesson.is_cancelled || class_ids.contains(&lesson.class_id) {
            continue;
        }
        let Some(class) = db::classes::find_class(db, lesson.class_id).await? else {
            continue;
        };
        let Some((start, end)) = lesson_times(&lesson) else {
            continue;
        };

        let mut event = CalEvent::new();
        event
            .uid(&format!("lesson-sub-{}@tabby-calendar", lesson.id))
            .summary(&format!(
                "[Sub] {} ({}/{})",
                class.name, lesson.lesson_number, class.total_lessons
            ))
            .location(lesson.room.label())
            .starts(start)
            .ends(end);
        if let Some(notes) = &lesson.notes {
            event.description(notes);
        }
        calendar.push(event.done());
    }

    // The teacher's own calendar events; no start time means all-day.
    for studio_event in db::events::events_for_teacher_since(db, user.id, cutoff).await? {
        let mut event = CalEvent::new();
        event
            .uid(&format!("event-{}@tabby-calendar", studio_event.id))
            .summary(&studio_event.title);
        if let Some(notes) = &studio_event.notes {
            event.description(notes);
        }

        match studio_event.start_time.as_deref().and_then(parse_time) {
            Some(start) => {
                let end = studio_event
                    .end_time
                    .as_deref()
                    .and_then(parse_time)
                    .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(start));
                event
                    .starts(studio_event.date.and_time(start))
                    .ends(studio_event.date.and_time(end));
            }
            None => {
                event.all_day(studio_event.date);
            }
        }
        calendar.push(event.done());
    }

    Ok(calendar.to_string())
}

fn lesson_times(lesson: &Lesson) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_time(&lesson.start_time);
    let end = parse_time(&lesson.end_time);
    match (start, end) {
        (Some(start), Some(end)) => {
            Some((lesson.date.and_time(start), lesson.date.and_time(end)))
        }
        _ => {
            warn!(
                "lesson {} has unparseable times {:?}-{:?}, skipping in feed",
                lesson.id, lesson.start_time, lesson.end_time
            );
            None
        }
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}
