use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::{CalendarLesson, Lesson, TeacherAssignment, TeacherView, UpdateLessonRequest};

const LESSON_COLUMNS: &str =
    "id, class_id, lesson_number, date, start_time, end_time, room, is_cancelled, notes, created_at, updated_at";

pub async fn find_lesson(db: &SqlitePool, id: i64) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_class_lessons(
    db: &SqlitePool,
    class_id: i64,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM lessons WHERE class_id = ? ORDER BY lesson_number"
    ))
    .bind(class_id)
    .fetch_all(db)
    .await
}

pub async fn lessons_for_class_since(
    db: &SqlitePool,
    class_id: i64,
    cutoff: NaiveDate,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM lessons WHERE class_id = ? AND date >= ? ORDER BY date"
    ))
    .bind(class_id)
    .bind(cutoff)
    .fetch_all(db)
    .await
}

/// Lessons in the inclusive date range, joined with their class for the
/// calendar view. Teachers are filled in by the caller.
pub async fn lessons_in_range(
    db: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CalendarLesson>, sqlx::Error> {
    sqlx::query_as::<_, CalendarLesson>(
        "SELECT l.id, l.class_id, c.name AS class_name, c.type AS class_type, \
         c.status AS class_status, c.color AS class_color, c.student_count, \
         l.lesson_number, c.total_lessons, l.date, l.start_time, l.end_time, \
         l.room, l.is_cancelled, l.notes \
         FROM lessons l INNER JOIN classes c ON c.id = l.class_id \
         WHERE l.date >= ? AND l.date <= ? \
         ORDER BY l.date, l.start_time",
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn update_lesson(
    db: &SqlitePool,
    id: i64,
    req: &UpdateLessonRequest,
) -> Result<Option<Lesson>, sqlx::Error> {
    let Some(mut current) = find_lesson(db, id).await? else {
        return Ok(None);
    };

    if let Some(date) = req.date {
        current.date = date;
    }
    if let Some(start_time) = &req.start_time {
        current.start_time = start_time.clone();
    }
    if let Some(end_time) = &req.end_time {
        current.end_time = end_time.clone();
    }
    if let Some(room) = req.room {
        current.room = room;
    }
    if let Some(is_cancelled) = req.is_cancelled {
        current.is_cancelled = is_cancelled;
    }
    if let Some(notes) = &req.notes {
        current.notes = Some(notes.clone());
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE lessons SET date = ?, start_time = ?, end_time = ?, room = ?, \
         is_cancelled = ?, notes = ?, updated_at = ? WHERE id = ?",
    )
    .bind(current.date)
    .bind(&current.start_time)
    .bind(&current.end_time)
    .bind(current.room)
    .bind(current.is_cancelled)
    .bind(&current.notes)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

/// Replaces the lesson's teacher overrides. An empty list clears them, which
/// reverts the lesson to its class-level teachers.
pub async fn replace_lesson_overrides(
    db: &SqlitePool,
    lesson_id: i64,
    overrides: &[TeacherAssignment],
) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM lesson_teacher_overrides WHERE lesson_id = ?")
        .bind(lesson_id)
        .execute(&mut *tx)
        .await?;
    for teacher in overrides {
        sqlx::query(
            "INSERT INTO lesson_teacher_overrides (lesson_id, teacher_id, role) VALUES (?, ?, ?)",
        )
        .bind(lesson_id)
        .bind(teacher.teacher_id)
        .bind(teacher.role)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn fetch_lesson_override_views(
    db: &SqlitePool,
    lesson_id: i64,
) -> Result<Vec<TeacherView>, sqlx::Error> {
    sqlx::query_as::<_, TeacherView>(
        "SELECT u.id, u.display_name, lto.role FROM lesson_teacher_overrides lto \
         INNER JOIN users u ON u.id = lto.teacher_id WHERE lto.lesson_id = ?",
    )
    .bind(lesson_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_override_teacher_ids(
    db: &SqlitePool,
    lesson_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT teacher_id FROM lesson_teacher_overrides WHERE lesson_id = ?")
        .bind(lesson_id)
        .fetch_all(db)
        .await
}

pub async fn lesson_ids_overridden_to(
    db: &SqlitePool,
    teacher_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT lesson_id FROM lesson_teacher_overrides WHERE teacher_id = ?")
        .bind(teacher_id)
        .fetch_all(db)
        .await
}
