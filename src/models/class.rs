use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::lesson::LessonWithTeachers;
use crate::schedule::SchedulePattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ClassType {
    Solo,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ClassStatus {
    Planned,
    Confirmed,
    Cancelled,
}

/// The studio has exactly two rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Room {
    RendezVous,
    Palomar,
}

impl Room {
    /// Human-readable room name, used in calendar exports.
    pub fn label(self) -> &'static str {
        match self {
            Room::RendezVous => "Rendez vous",
            Room::Palomar => "Palomar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TeacherRole {
    Solo,
    Leader,
    Follower,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DanceClass {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: ClassType,
    pub status: ClassStatus,
    pub total_lessons: i64,
    pub student_count: i64,
    pub room: Room,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A teacher as shown on a class or lesson: joined from `users`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeacherView {
    pub id: i64,
    pub display_name: String,
    pub role: TeacherRole,
}

/// Assignment as submitted by a client when creating or updating a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub teacher_id: i64,
    pub role: TeacherRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassWithTeachers {
    #[serde(flatten)]
    pub class: DanceClass,
    pub teachers: Vec<TeacherView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lessons: Vec<LessonWithTeachers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClassRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ClassType,
    pub room: Room,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub total_lessons: Option<i64>,
    #[serde(default)]
    pub teachers: Vec<TeacherAssignment>,
    pub first_date: chrono::NaiveDate,
    pub patterns: Vec<SchedulePattern>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ClassType>,
    pub status: Option<ClassStatus>,
    pub student_count: Option<i64>,
    pub room: Option<Room>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub teachers: Option<Vec<TeacherAssignment>>,
}
