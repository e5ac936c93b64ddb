use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Room;

/// A weekly recurrence rule for one class: which weekday, which time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePattern {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
}

/// One concrete lesson produced by [`generate`]. The caller attaches the
/// class id and timestamps when persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedLesson {
    pub lesson_number: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub room: Room,
    pub is_cancelled: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("at least one schedule pattern is required")]
    EmptyPatterns,
    #[error("total_lessons must be at least 1, got {0}")]
    InvalidLessonCount(i64),
    #[error("day_of_week must be between 0 and 6, got {0}")]
    InvalidDayOfWeek(u8),
}

/// Generates the full lesson sequence for a new class.
///
/// Each pattern starts at its first occurrence on or after `first_date`.
/// Lessons are emitted in chronological order by always taking the earliest
/// pending occurrence across all patterns and then advancing that pattern by
/// one week, so multiple patterns interleave (Tuesday/Thursday alternate).
/// When two patterns land on the same date, the one submitted first wins.
pub fn generate(
    total_lessons: i64,
    first_date: NaiveDate,
    patterns: &[SchedulePattern],
    room: Room,
) -> Result<Vec<GeneratedLesson>, ScheduleError> {
    if total_lessons < 1 {
        return Err(ScheduleError::InvalidLessonCount(total_lessons));
    }
    if patterns.is_empty() {
        return Err(ScheduleError::EmptyPatterns);
    }
    if let Some(p) = patterns.iter().find(|p| p.day_of_week > 6) {
        return Err(ScheduleError::InvalidDayOfWeek(p.day_of_week));
    }

    let first_weekday = first_date.weekday().num_days_from_sunday();

    // One pending occurrence per pattern. If first_date already falls on the
    // pattern's weekday the offset is zero.
    let mut upcoming: Vec<NaiveDate> = patterns
        .iter()
        .map(|p| {
            let offset = (i64::from(p.day_of_week) - i64::from(first_weekday)).rem_euclid(7);
            first_date + Days::new(offset as u64)
        })
        .collect();

    let mut lessons = Vec::with_capacity(total_lessons as usize);
    for lesson_number in 1..=total_lessons {
        let next = (0..upcoming.len())
            .min_by_key(|&i| (upcoming[i], i))
            .unwrap_or(0);
        let pattern = &patterns[next];

        lessons.push(GeneratedLesson {
            lesson_number,
            date: upcoming[next],
            start_time: pattern.start_time.clone(),
            end_time: pattern.end_time.clone(),
            room,
            is_cancelled: false,
            notes: None,
        });

        upcoming[next] = upcoming[next] + Days::new(7);
    }

    Ok(lessons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn pattern(day_of_week: u8, start: &str, end: &str) -> SchedulePattern {
        SchedulePattern {
            day_of_week,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    #[test]
    fn single_pattern_weekly_from_matching_weekday() {
        // 2024-01-03 is a Wednesday, pattern is Wednesday.
        let lessons = generate(
            3,
            date("2024-01-03"),
            &[pattern(3, "10:00", "11:00")],
            Room::Palomar,
        )
        .expect("valid input");

        let dates: Vec<NaiveDate> = lessons.iter().map(|l| l.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-03"), date("2024-01-10"), date("2024-01-17")]
        );
        assert!(lessons.iter().all(|l| l.start_time == "10:00"));
        assert!(lessons.iter().all(|l| l.end_time == "11:00"));
    }

    #[test]
    fn two_patterns_interleave_chronologically() {
        // 2024-01-01 is a Monday; Tuesday and Thursday patterns should give
        // Tue, Thu, Tue+7, Thu+7.
        let lessons = generate(
            4,
            date("2024-01-01"),
            &[
                pattern(2, "18:15", "19:45"),
                pattern(4, "18:15", "19:45"),
            ],
            Room::RendezVous,
        )
        .expect("valid input");

        let dates: Vec<NaiveDate> = lessons.iter().map(|l| l.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2024-01-02"),
                date("2024-01-04"),
                date("2024-01-09"),
                date("2024-01-11"),
            ]
        );
    }

    #[test]
    fn lesson_numbers_are_contiguous_from_one() {
        let lessons = generate(
            10,
            date("2024-05-15"),
            &[pattern(1, "09:00", "10:00"), pattern(5, "17:00", "18:00")],
            Room::Palomar,
        )
        .expect("valid input");

        assert_eq!(lessons.len(), 10);
        let numbers: Vec<i64> = lessons.iter().map(|l| l.lesson_number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn every_lesson_weekday_matches_a_pattern() {
        let patterns = [pattern(0, "12:00", "13:00"), pattern(6, "12:00", "13:00")];
        let lessons =
            generate(8, date("2024-03-06"), &patterns, Room::RendezVous).expect("valid input");

        for lesson in &lessons {
            let weekday = lesson.date.weekday();
            assert!(
                weekday == Weekday::Sun || weekday == Weekday::Sat,
                "unexpected weekday {weekday} on {}",
                lesson.date
            );
        }
    }

    #[test]
    fn same_day_patterns_tie_break_by_input_order() {
        // Both patterns fall on the same Wednesday; the first one submitted
        // must produce lesson 1.
        let lessons = generate(
            2,
            date("2024-01-03"),
            &[pattern(3, "18:00", "19:00"), pattern(3, "10:00", "11:00")],
            Room::Palomar,
        )
        .expect("valid input");

        assert_eq!(lessons[0].start_time, "18:00");
        assert_eq!(lessons[1].start_time, "10:00");
        assert_eq!(lessons[0].date, lessons[1].date);
    }

    #[test]
    fn generation_is_deterministic() {
        let patterns = [pattern(2, "18:15", "19:45"), pattern(4, "20:00", "21:30")];
        let a = generate(12, date("2024-09-02"), &patterns, Room::RendezVous);
        let b = generate(12, date("2024-09-02"), &patterns, Room::RendezVous);
        assert_eq!(a, b);
    }

    #[test]
    fn freshly_generated_lessons_are_not_cancelled() {
        let lessons = generate(
            6,
            date("2024-02-01"),
            &[pattern(4, "19:00", "20:30")],
            Room::Palomar,
        )
        .expect("valid input");
        assert!(lessons.iter().all(|l| !l.is_cancelled));
        assert!(lessons.iter().all(|l| l.notes.is_none()));
    }

    #[test]
    fn empty_pattern_set_is_rejected() {
        let err = generate(6, date("2024-01-01"), &[], Room::Palomar).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyPatterns);
    }

    #[test]
    fn non_positive_lesson_count_is_rejected() {
        let patterns = [pattern(1, "10:00", "11:00")];
        assert_eq!(
            generate(0, date("2024-01-01"), &patterns, Room::Palomar).unwrap_err(),
            ScheduleError::InvalidLessonCount(0)
        );
        assert_eq!(
            generate(-3, date("2024-01-01"), &patterns, Room::Palomar).unwrap_err(),
            ScheduleError::InvalidLessonCount(-3)
        );
    }

    #[test]
    fn out_of_range_weekday_is_rejected() {
        let err = generate(
            1,
            date("2024-01-01"),
            &[pattern(7, "10:00", "11:00")],
            Room::Palomar,
        )
        .unwrap_err();
        assert_eq!(err, ScheduleError::InvalidDayOfWeek(7));
    }
}
