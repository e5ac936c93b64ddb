use chrono::{Days, Months, NaiveDate};

use crate::models::{EventView, RecurrencePeriod};

/// Expands recurring events into concrete occurrences inside
/// `[range_start, range_end]` (both inclusive) and merges them with the
/// already range-filtered non-recurring events.
///
/// The result is sorted by date, then start time, with all-day entries
/// (no start time) ahead of timed ones on the same day.
pub fn expand(
    range_start: NaiveDate,
    range_end: NaiveDate,
    non_recurring: Vec<EventView>,
    recurring: Vec<EventView>,
) -> Vec<EventView> {
    let mut occurrences = non_recurring;

    for event in recurring {
        // A recurring flag without a period is degraded input: it expands to
        // nothing rather than erroring.
        let Some(period) = event.recurrence_period else {
            continue;
        };
        if event.date > range_end {
            continue;
        }
        for date in occurrence_dates(event.date, period, range_end) {
            if date >= range_start {
                let mut occurrence = event.clone();
                occurrence.date = date;
                occurrences.push(occurrence);
            }
        }
    }

    occurrences.sort_by(|a, b| {
        (a.date, a.start_time.as_deref()).cmp(&(b.date, b.start_time.as_deref()))
    });
    occurrences
}

/// All occurrence dates from `anchor` up to and including `range_end`.
///
/// Monthly steps are always computed from the anchor, so a day-of-month
/// clamped by a short month comes back in longer ones:
/// Jan 31 -> Feb 28/29 -> Mar 31.
fn occurrence_dates(
    anchor: NaiveDate,
    period: RecurrencePeriod,
    range_end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut step: u32 = 0;
    loop {
        let next = match period {
            RecurrencePeriod::Daily => anchor.checked_add_days(Days::new(u64::from(step))),
            RecurrencePeriod::Weekly => anchor.checked_add_days(Days::new(u64::from(step) * 7)),
            RecurrencePeriod::Monthly => anchor.checked_add_months(Months::new(step)),
        };
        match next {
            Some(date) if date <= range_end => dates.push(date),
            _ => break,
        }
        step += 1;
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    fn event(id: i64, day: &str, start_time: Option<&str>) -> EventView {
        EventView {
            id,
            kind: EventType::Party,
            title: format!("event {id}"),
            date: date(day),
            end_date: None,
            start_time: start_time.map(String::from),
            end_time: None,
            room: None,
            teacher_id: None,
            teacher_name: None,
            is_recurring: false,
            recurrence_period: None,
            notes: None,
        }
    }

    fn recurring(id: i64, anchor: &str, period: Option<RecurrencePeriod>) -> EventView {
        let mut e = event(id, anchor, Some("20:00"));
        e.is_recurring = true;
        e.recurrence_period = period;
        e
    }

    #[test]
    fn weekly_expansion_is_inclusive_on_both_range_ends() {
        // Anchored on Monday 2024-01-01, queried from the 8th to the 22nd:
        // the anchor itself is out of range, the 8th, 15th and 22nd are in.
        let occurrences = expand(
            date("2024-01-08"),
            date("2024-01-22"),
            vec![],
            vec![recurring(1, "2024-01-01", Some(RecurrencePeriod::Weekly))],
        );

        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-08"), date("2024-01-15"), date("2024-01-22")]
        );
    }

    #[test]
    fn daily_expansion_fills_the_range() {
        let occurrences = expand(
            date("2024-06-10"),
            date("2024-06-13"),
            vec![],
            vec![recurring(1, "2024-06-01", Some(RecurrencePeriod::Daily))],
        );
        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2024-06-10"),
                date("2024-06-11"),
                date("2024-06-12"),
                date("2024-06-13"),
            ]
        );
    }

    #[test]
    fn monthly_end_of_month_clamps_but_recovers() {
        // Jan 31 anchored monthly in a leap year: Feb 29, then back to the
        // 31st in March, clamped again to Apr 30.
        let occurrences = expand(
            date("2024-01-01"),
            date("2024-04-30"),
            vec![],
            vec![recurring(1, "2024-01-31", Some(RecurrencePeriod::Monthly))],
        );
        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2024-01-31"),
                date("2024-02-29"),
                date("2024-03-31"),
                date("2024-04-30"),
            ]
        );
    }

    #[test]
    fn anchor_after_range_end_contributes_nothing() {
        let occurrences = expand(
            date("2024-01-01"),
            date("2024-01-31"),
            vec![],
            vec![recurring(1, "2024-02-01", Some(RecurrencePeriod::Daily))],
        );
        assert!(occurrences.is_empty());
    }

    #[test]
    fn recurring_without_period_expands_to_nothing() {
        let occurrences = expand(
            date("2024-01-01"),
            date("2024-12-31"),
            vec![],
            vec![recurring(1, "2024-01-01", None)],
        );
        assert!(occurrences.is_empty());
    }

    #[test]
    fn all_day_events_sort_before_timed_ones() {
        let timed = event(1, "2024-03-05", Some("14:00"));
        let all_day = event(2, "2024-03-05", None);

        let occurrences = expand(
            date("2024-03-01"),
            date("2024-03-31"),
            vec![timed, all_day],
            vec![],
        );

        assert_eq!(occurrences[0].id, 2);
        assert_eq!(occurrences[1].id, 1);
    }

    #[test]
    fn merged_output_is_sorted_by_date_then_time() {
        let one_off = event(1, "2024-05-03", Some("09:00"));
        let weekly = recurring(2, "2024-05-01", Some(RecurrencePeriod::Weekly));

        let occurrences = expand(date("2024-05-01"), date("2024-05-15"), vec![one_off], vec![weekly]);

        let keys: Vec<(NaiveDate, Option<String>)> = occurrences
            .iter()
            .map(|o| (o.date, o.start_time.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(occurrences.len(), 4);
    }

    #[test]
    fn occurrences_keep_the_source_fields() {
        let mut weekly = recurring(7, "2024-05-01", Some(RecurrencePeriod::Weekly));
        weekly.title = "Practica".to_string();
        weekly.notes = Some("bring shoes".to_string());

        let occurrences = expand(date("2024-05-08"), date("2024-05-08"), vec![], vec![weekly]);

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].id, 7);
        assert_eq!(occurrences[0].title, "Practica");
        assert_eq!(occurrences[0].notes.as_deref(), Some("bring shoes"));
        assert_eq!(occurrences[0].date, date("2024-05-08"));
    }
}
