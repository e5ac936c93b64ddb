use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use tabby_backend::db;
use tabby_backend::models::{
    ClassStatus, ClassType, NewClassRequest, NewUserRequest, Room, TeacherAssignment, TeacherRole,
    UpdateClassRequest, UpdateLessonRequest, UserRole,
};
use tabby_backend::schedule::{self, SchedulePattern};
use tabby_backend::services::auth;

async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    // An in-memory SQLite database exists per connection, so keep a single
    // long-lived connection or the migrated schema is lost.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn seed_teacher(pool: &SqlitePool, username: &str) -> i64 {
    let hash = auth::hash_password("pw").expect("Failed to hash password");
    let req = NewUserRequest {
        username: username.to_string(),
        password: String::new(),
        display_name: username.to_string(),
        role: Some(UserRole::Teacher),
    };
    db::users::insert_user(pool, &req, &hash)
        .await
        .expect("Failed to insert user")
        .id
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date literal")
}

fn new_class_request(teacher_id: i64) -> NewClassRequest {
    NewClassRequest {
        name: "Salsa Beginners".to_string(),
        kind: ClassType::Solo,
        room: Room::Palomar,
        color: Some("#E74C3C".to_string()),
        notes: None,
        total_lessons: Some(4),
        teachers: vec![TeacherAssignment {
            teacher_id,
            role: TeacherRole::Solo,
        }],
        // 2024-01-01 is a Monday.
        first_date: date("2024-01-01"),
        patterns: vec![
            SchedulePattern {
                day_of_week: 2,
                start_time: "18:15".to_string(),
                end_time: "19:45".to_string(),
            },
            SchedulePattern {
                day_of_week: 4,
                start_time: "18:15".to_string(),
                end_time: "19:45".to_string(),
            },
        ],
    }
}

#[tokio::test]
async fn create_class_persists_generated_lessons() {
    let pool = setup_test_db().await;
    let teacher_id = seed_teacher(&pool, "maria").await;

    let req = new_class_request(teacher_id);
    let lessons =
        schedule::generate(4, req.first_date, &req.patterns, req.room).expect("valid schedule");
    let class = db::classes::create_class_with_lessons(&pool, &req, "#E74C3C", &lessons)
        .await
        .expect("Failed to create class");

    assert_eq!(class.status, ClassStatus::Planned);
    assert_eq!(class.total_lessons, 4);

    let stored = db::lessons::fetch_class_lessons(&pool, class.id)
        .await
        .expect("Failed to fetch lessons");
    assert_eq!(stored.len(), 4);
    let numbers: Vec<i64> = stored.iter().map(|l| l.lesson_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    let dates: Vec<NaiveDate> = stored.iter().map(|l| l.date).collect();
    assert_eq!(
        dates,
        vec![
            date("2024-01-02"),
            date("2024-01-04"),
            date("2024-01-09"),
            date("2024-01-11"),
        ]
    );

    let teachers = db::classes::fetch_class_teachers(&pool, class.id)
        .await
        .expect("Failed to fetch class teachers");
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].id, teacher_id);
}

#[tokio::test]
async fn six_students_confirm_a_planned_class() {
    let pool = setup_test_db().await;
    let teacher_id = seed_teacher(&pool, "maria").await;

    let req = new_class_request(teacher_id);
    let lessons =
        schedule::generate(4, req.first_date, &req.patterns, req.room).expect("valid schedule");
    let class = db::classes::create_class_with_lessons(&pool, &req, "#E74C3C", &lessons)
        .await
        .expect("Failed to create class");

    let update = UpdateClassRequest {
        name: None,
        kind: None,
        status: None,
        student_count: Some(6),
        room: None,
        color: None,
        notes: None,
        teachers: None,
    };
    let updated = db::classes::update_class(&pool, class.id, &update)
        .await
        .expect("Failed to update class")
        .expect("Class not found");

    assert_eq!(updated.student_count, 6);
    assert_eq!(updated.status, ClassStatus::Confirmed);

    // A confirmed class does not get re-confirmed or demoted by later counts.
    let update = UpdateClassRequest {
        student_count: Some(3),
        name: None,
        kind: None,
        status: None,
        room: None,
        color: None,
        notes: None,
        teachers: None,
    };
    let updated = db::classes::update_class(&pool, class.id, &update)
        .await
        .expect("Failed to update class")
        .expect("Class not found");
    assert_eq!(updated.status, ClassStatus::Confirmed);
}

#[tokio::test]
async fn deleting_a_class_cascades_to_lessons() {
    let pool = setup_test_db().await;
    let teacher_id = seed_teacher(&pool, "maria").await;

    let req = new_class_request(teacher_id);
    let lessons =
        schedule::generate(4, req.first_date, &req.patterns, req.room).expect("valid schedule");
    let class = db::classes::create_class_with_lessons(&pool, &req, "#E74C3C", &lessons)
        .await
        .expect("Failed to create class");

    let deleted = db::classes::delete_class(&pool, class.id)
        .await
        .expect("Failed to delete class");
    assert!(deleted);

    let remaining = db::lessons::fetch_class_lessons(&pool, class.id)
        .await
        .expect("Failed to fetch lessons");
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn lesson_updates_and_overrides() {
    let pool = setup_test_db().await;
    let teacher_id = seed_teacher(&pool, "maria").await;
    let sub_id = seed_teacher(&pool, "jonas").await;

    let req = new_class_request(teacher_id);
    let lessons =
        schedule::generate(4, req.first_date, &req.patterns, req.room).expect("valid schedule");
    let class = db::classes::create_class_with_lessons(&pool, &req, "#E74C3C", &lessons)
        .await
        .expect("Failed to create class");
    let stored = db::lessons::fetch_class_lessons(&pool, class.id)
        .await
        .expect("Failed to fetch lessons");
    let lesson_id = stored[0].id;

    let update = UpdateLessonRequest {
        date: Some(date("2024-01-03")),
        start_time: None,
        end_time: None,
        room: Some(Room::RendezVous),
        is_cancelled: Some(true),
        notes: Some("moved and cancelled".to_string()),
        teacher_overrides: None,
    };
    let updated = db::lessons::update_lesson(&pool, lesson_id, &update)
        .await
        .expect("Failed to update lesson")
        .expect("Lesson not found");
    assert_eq!(updated.date, date("2024-01-03"));
    assert_eq!(updated.room, Room::RendezVous);
    assert!(updated.is_cancelled);
    // Untouched fields survive a partial update.
    assert_eq!(updated.start_time, "18:15");

    db::lessons::replace_lesson_overrides(
        &pool,
        lesson_id,
        &[TeacherAssignment {
            teacher_id: sub_id,
            role: TeacherRole::Solo,
        }],
    )
    .await
    .expect("Failed to set overrides");

    let overrides = db::lessons::fetch_lesson_override_views(&pool, lesson_id)
        .await
        .expect("Failed to fetch overrides");
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].id, sub_id);

    // An empty list reverts to class teachers.
    db::lessons::replace_lesson_overrides(&pool, lesson_id, &[])
        .await
        .expect("Failed to clear overrides");
    let overrides = db::lessons::fetch_lesson_override_views(&pool, lesson_id)
        .await
        .expect("Failed to fetch overrides");
    assert!(overrides.is_empty());
}
