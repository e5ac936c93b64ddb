pub mod audit;
pub mod class;
pub mod color_keyword;
pub mod event;
pub mod lesson;
pub mod user;

pub use audit::AuditEntry;
pub use class::{
    ClassStatus, ClassType, ClassWithTeachers, DanceClass, NewClassRequest, Room,
    TeacherAssignment, TeacherRole, TeacherView, UpdateClassRequest,
};
pub use color_keyword::{ColorKeyword, NewColorKeywordRequest, UpdateColorKeywordRequest};
pub use event::{Event, EventType, EventView, NewEventRequest, RecurrencePeriod, UpdateEventRequest};
pub use lesson::{CalendarLesson, Lesson, LessonWithTeachers, UpdateLessonRequest};
pub use user::{NewUserRequest, UpdateUserRequest, User, UserRole, UserView};
