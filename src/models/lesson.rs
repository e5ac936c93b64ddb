use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::class::{ClassStatus, ClassType, Room, TeacherAssignment, TeacherView};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lesson {
    pub id: i64,
    pub class_id: i64,
    pub lesson_number: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub room: Room,
    pub is_cancelled: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A lesson with its effective teachers: the per-lesson overrides when any
/// exist, otherwise the class-level assignments.
#[derive(Debug, Clone, Serialize)]
pub struct LessonWithTeachers {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub teachers: Vec<TeacherView>,
    pub has_override: bool,
}

/// One row of the calendar query: a lesson joined with its class.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CalendarLesson {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub class_type: ClassType,
    pub class_status: ClassStatus,
    pub class_color: Option<String>,
    pub student_count: i64,
    pub lesson_number: i64,
    pub total_lessons: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub room: Room,
    pub is_cancelled: bool,
    pub notes: Option<String>,
    #[sqlx(skip)]
    pub teachers: Vec<TeacherView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLessonRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<Room>,
    pub is_cancelled: Option<bool>,
    pub notes: Option<String>,
    pub teacher_overrides: Option<Vec<TeacherAssignment>>,
}
