//! Pure scheduling computations: lesson generation for a new class and
//! recurrence expansion for calendar queries. No I/O, no shared state.

pub mod generator;
pub mod recurrence;

pub use generator::{GeneratedLesson, ScheduleError, SchedulePattern, generate};
pub use recurrence::expand;
