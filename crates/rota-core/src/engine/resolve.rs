//! Availability resolution: which hours a schedule is open on a given date.

use jiff::{civil::Date, ToSpan};

use crate::models::{Schedule, TimeInterval, WeekdayKey};

/// Resolves the open intervals of `schedule` on `date`.
///
/// Exceptions win over the weekly pattern:
///
/// 1. an exception with `available = false` closes the day;
/// 2. an open exception with replacement hours uses those hours, and an
///    empty list leaves the day without hours;
/// 3. an open exception without hours falls back to the weekly pattern;
/// 4. without an exception the weekly pattern for the weekday applies.
///
/// An empty slice means the agent is unavailable that day.
pub fn resolve(schedule: &Schedule, date: Date) -> &[TimeInterval] {
    match schedule.exception_for(date) {
        Some(exception) if !exception.available => &[],
        Some(exception) => match exception.replacement_hours() {
            Some(hours) => hours,
            None => weekly_hours(schedule, date),
        },
        None => weekly_hours(schedule, date),
    }
}

fn weekly_hours(schedule: &Schedule, date: Date) -> &[TimeInterval] {
    schedule.weekly_pattern.intervals_for(WeekdayKey::of(date))
}

/// Every date in `[start, end]`, ascending. Empty when `end < start`.
pub fn dates_between(start: Date, end: Date) -> impl Iterator<Item = Date> {
    start.series(1.day()).take_while(move |date| *date <= end)
}

/// Dates in `[start, end]` on which the schedule has at least one open
/// interval.
pub fn available_dates(schedule: &Schedule, start: Date, end: Date) -> Vec<Date> {
    dates_between(start, end)
        .filter(|date| !resolve(schedule, *date).is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{DayRule, Exception, WeeklyPattern};

    fn interval(s: &str) -> TimeInterval {
        TimeInterval::parse(s).unwrap()
    }

    fn weekday_schedule() -> Schedule {
        let rules = [
            WeekdayKey::Monday,
            WeekdayKey::Tuesday,
            WeekdayKey::Wednesday,
            WeekdayKey::Thursday,
            WeekdayKey::Friday,
        ]
        .into_iter()
        .map(|day| DayRule::new(day, vec![interval("09:00-12:00"), interval("14:00-17:00")]))
        .collect();

        Schedule {
            id: 1,
            agent_id: "agent-a".to_string(),
            org_id: "org-1".to_string(),
            org_service_id: None,
            weekly_pattern: WeeklyPattern::new(rules).unwrap(),
            exceptions: BTreeMap::new(),
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn with_exception(mut schedule: Schedule, exception: Exception) -> Schedule {
        schedule.exceptions.insert(exception.date, exception);
        schedule
    }

    #[test]
    fn test_weekly_pattern_applies_without_exception() {
        let schedule = weekday_schedule();
        // 2024-01-01 is a Monday
        assert_eq!(
            resolve(&schedule, date(2024, 1, 1)),
            [interval("09:00-12:00"), interval("14:00-17:00")]
        );
        // 2024-01-06 is a Saturday
        assert!(resolve(&schedule, date(2024, 1, 6)).is_empty());
    }

    #[test]
    fn test_closed_exception_wins_over_pattern() {
        let day = date(2024, 1, 3);
        let schedule = with_exception(
            weekday_schedule(),
            Exception::closed(day, Some("holiday".to_string())),
        );
        assert!(resolve(&schedule, day).is_empty());
        assert_eq!(resolve(&schedule, date(2024, 1, 4)).len(), 2);
    }

    #[test]
    fn test_replacement_hours_win_over_pattern() {
        let day = date(2024, 1, 2);
        let schedule = with_exception(
            weekday_schedule(),
            Exception::with_hours(day, vec![interval("10:00-11:00")], None),
        );
        assert_eq!(resolve(&schedule, day), [interval("10:00-11:00")]);
    }

    #[test]
    fn test_replacement_hours_open_a_weekend_day() {
        let saturday = date(2024, 1, 6);
        let schedule = with_exception(
            weekday_schedule(),
            Exception::with_hours(saturday, vec![interval("08:00-10:00")], None),
        );
        assert_eq!(resolve(&schedule, saturday), [interval("08:00-10:00")]);
    }

    #[test]
    fn test_open_exception_without_hours_falls_back_to_pattern() {
        let monday = date(2024, 1, 8);
        let schedule = with_exception(
            weekday_schedule(),
            Exception {
                date: monday,
                available: true,
                intervals: None,
                reason: Some("confirmed".to_string()),
            },
        );
        assert_eq!(resolve(&schedule, monday).len(), 2);
    }

    #[test]
    fn test_empty_replacement_hours_close_a_working_day() {
        // 2024-01-02 is a Tuesday with weekly hours
        let tuesday = date(2024, 1, 2);
        let schedule = with_exception(
            weekday_schedule(),
            Exception::with_hours(tuesday, vec![], Some("offsite".to_string())).normalized(),
        );
        assert!(resolve(&schedule, tuesday).is_empty());
        assert_eq!(resolve(&schedule, date(2024, 1, 3)).len(), 2);

        let dates = available_dates(&schedule, date(2024, 1, 1), date(2024, 1, 3));
        assert_eq!(dates, [date(2024, 1, 1), date(2024, 1, 3)]);
    }

    #[test]
    fn test_dates_between_is_inclusive() {
        let dates: Vec<Date> = dates_between(date(2024, 2, 27), date(2024, 3, 1)).collect();
        assert_eq!(
            dates,
            [date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
        assert_eq!(dates_between(date(2024, 1, 1), date(2024, 1, 1)).count(), 1);
        assert_eq!(dates_between(date(2024, 1, 2), date(2024, 1, 1)).count(), 0);
    }

    #[test]
    fn test_available_dates_skips_weekends_and_closures() {
        let schedule = with_exception(
            weekday_schedule(),
            Exception::closed(date(2024, 1, 3), None),
        );
        let dates = available_dates(&schedule, date(2024, 1, 1), date(2024, 1, 7));
        assert_eq!(
            dates,
            [date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 4), date(2024, 1, 5)]
        );
    }
}
