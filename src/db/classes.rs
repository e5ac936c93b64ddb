use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{
    ClassStatus, DanceClass, NewClassRequest, TeacherAssignment, TeacherView, UpdateClassRequest,
};
use crate::schedule::GeneratedLesson;

/// Students needed before a planned class is automatically confirmed.
const CONFIRM_THRESHOLD: i64 = 6;

const CLASS_COLUMNS: &str =
    "id, name, type, status, total_lessons, student_count, room, color, notes, created_at, updated_at";

pub async fn fetch_classes(db: &SqlitePool) -> Result<Vec<DanceClass>, sqlx::Error> {
    sqlx::query_as::<_, DanceClass>(&format!(
        "SELECT {CLASS_COLUMNS} FROM classes ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_class(db: &SqlitePool, id: i64) -> Result<Option<DanceClass>, sqlx::Error> {
    sqlx::query_as::<_, DanceClass>(&format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Inserts the class, its teacher assignments and all generated lessons in
/// one transaction, so a failure never leaves a class without its lessons.
pub async fn create_class_with_lessons(
    db: &SqlitePool,
    req: &NewClassRequest,
    color: &str,
    lessons: &[GeneratedLesson],
) -> Result<DanceClass, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let total_lessons = req.total_lessons.unwrap_or(6);

    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "INSERT INTO classes (name, type, status, total_lessons, student_count, room, color, notes, created_at, updated_at) \
         VALUES (?, ?, 'planned', ?, 0, ?, ?, ?, ?, ?)",
    )
    .bind(&req.name)
    .bind(req.kind)
    .bind(total_lessons)
    .bind(req.room)
    .bind(color)
    .bind(&req.notes)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;
    let class_id = result.last_insert_rowid();

    for teacher in &req.teachers {
        sqlx::query("INSERT INTO class_teachers (class_id, teacher_id, role) VALUES (?, ?, ?)")
            .bind(class_id)
            .bind(teacher.teacher_id)
            .bind(teacher.role)
            .execute(&mut *tx)
            .await?;
    }

    for lesson in lessons {
        sqlx::query(
            "INSERT INTO lessons (class_id, lesson_number, date, start_time, end_time, room, is_cancelled, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(class_id)
        .bind(lesson.lesson_number)
        .bind(lesson.date)
        .bind(&lesson.start_time)
        .bind(&lesson.end_time)
        .bind(lesson.room)
        .bind(lesson.is_cancelled)
        .bind(&lesson.notes)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(DanceClass {
        id: class_id,
        name: req.name.clone(),
        kind: req.kind,
        status: ClassStatus::Planned,
        total_lessons,
        student_count: 0,
        room: req.room,
        color: Some(color.to_string()),
        notes: req.notes.clone(),
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn fetch_class_teachers(
    db: &SqlitePool,
    class_id: i64,
) -> Result<Vec<TeacherView>, sqlx::Error> {
    sqlx::query_as::<_, TeacherView>(
        "SELECT u.id, u.display_name, ct.role FROM class_teachers ct \
         INNER JOIN users u ON u.id = ct.teacher_id WHERE ct.class_id = ?",
    )
    .bind(class_id)
    .fetch_all(db)
    .await
}

pub async fn replace_class_teachers(
    db: &SqlitePool,
    class_id: i64,
    teachers: &[TeacherAssignment],
) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM class_teachers WHERE class_id = ?")
        .bind(class_id)
        .execute(&mut *tx)
        .await?;
    for teacher in teachers {
        sqlx::query("INSERT INTO class_teachers (class_id, teacher_id, role) VALUES (?, ?, ?)")
            .bind(class_id)
            .bind(teacher.teacher_id)
            .bind(teacher.role)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn update_class(
    db: &SqlitePool,
    id: i64,
    req: &UpdateClassRequest,
) -> Result<Option<DanceClass>, sqlx::Error> {
    let Some(mut current) = find_class(db, id).await? else {
        return Ok(None);
    };
    let old_status = current.status;

    if let Some(name) = &req.name {
        current.name = name.clone();
    }
    if let Some(kind) = req.kind {
        current.kind = kind;
    }
    if let Some(status) = req.status {
        current.status = status;
    }
    if let Some(student_count) = req.student_count {
        current.student_count = student_count;
        // Enough students: a planned class confirms itself.
        if student_count >= CONFIRM_THRESHOLD && old_status == ClassStatus::Planned {
            current.status = ClassStatus::Confirmed;
        }
    }
    if let Some(room) = req.room {
        current.room = room;
    }
    if let Some(color) = &req.color {
        current.color = Some(color.clone());
    }
    if let Some(notes) = &req.notes {
        current.notes = Some(notes.clone());
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE classes SET name = ?, type = ?, status = ?, total_lessons = ?, student_count = ?, \
         room = ?, color = ?, notes = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&current.name)
    .bind(current.kind)
    .bind(current.status)
    .bind(current.total_lessons)
    .bind(current.student_count)
    .bind(current.room)
    .bind(&current.color)
    .bind(&current.notes)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_class(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn class_ids_for_teacher(
    db: &SqlitePool,
    teacher_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT class_id FROM class_teachers WHERE teacher_id = ?")
        .bind(teacher_id)
        .fetch_all(db)
        .await
}
