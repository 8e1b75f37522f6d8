//! Interval partitioning: cutting an open window into fixed-length slots.

use crate::{
    error::{Result, SchedulerError},
    models::TimeInterval,
};

/// Splits `window` into consecutive `[cursor, cursor + duration)` slots,
/// advancing the cursor by `duration + break` after each one.
///
/// Stops at the first slot that would end after `window.end`; partial slots
/// are never emitted. The output is ascending and deterministic.
///
/// # Errors
///
/// `InvalidParameter` when `duration_minutes` is zero.
///
/// # Examples
///
/// ```rust
/// use rota_core::{engine::partition, models::TimeInterval};
///
/// let window = TimeInterval::parse("09:00-12:00").unwrap();
/// let slots = partition(&window, 60, 0).unwrap();
/// let labels: Vec<String> = slots.iter().map(ToString::to_string).collect();
/// assert_eq!(labels, ["09:00-10:00", "10:00-11:00", "11:00-12:00"]);
/// ```
pub fn partition(
    window: &TimeInterval,
    duration_minutes: u32,
    break_minutes: u32,
) -> Result<Vec<TimeInterval>> {
    if duration_minutes == 0 {
        return Err(SchedulerError::invalid_parameter("duration_minutes")
            .with_reason("must be greater than zero"));
    }

    let end = window.end_minute();
    let step = duration_minutes.saturating_add(break_minutes);
    let mut cursor = window.start_minute();
    let mut slots = Vec::new();

    while cursor.saturating_add(duration_minutes) <= end {
        slots.push(TimeInterval::from_minutes(cursor, cursor + duration_minutes)?);
        cursor = cursor.saturating_add(step);
    }

    Ok(slots)
}

/// Number of slots [`partition`] yields for a window of `window_minutes`.
pub fn expected_slot_count(window_minutes: u32, duration_minutes: u32, break_minutes: u32) -> u32 {
    if duration_minutes == 0 || window_minutes < duration_minutes {
        return 0;
    }
    (window_minutes - duration_minutes) / duration_minutes.saturating_add(break_minutes) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(s: &str) -> TimeInterval {
        TimeInterval::parse(s).unwrap()
    }

    fn labels(slots: &[TimeInterval]) -> Vec<String> {
        slots.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let err = partition(&window("09:00-12:00"), 0, 5).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidParameter { ref field, .. } if field == "duration_minutes"));
    }

    #[test]
    fn test_window_shorter_than_duration_is_empty() {
        assert!(partition(&window("09:00-09:20"), 30, 0).unwrap().is_empty());
    }

    #[test]
    fn test_exact_fit() {
        let slots = partition(&window("09:00-09:30"), 30, 0).unwrap();
        assert_eq!(labels(&slots), ["09:00-09:30"]);
    }

    #[test]
    fn test_break_spacing_drops_overflowing_slot() {
        let slots = partition(&window("09:00-12:00"), 30, 10).unwrap();
        assert_eq!(
            labels(&slots),
            ["09:00-09:30", "09:40-10:10", "10:20-10:50", "11:00-11:30"]
        );
        assert_eq!(slots.len() as u32, expected_slot_count(180, 30, 10));
    }

    #[test]
    fn test_large_break_leaves_single_slot() {
        let slots = partition(&window("09:00-12:00"), 45, 600).unwrap();
        assert_eq!(labels(&slots), ["09:00-09:45"]);
    }

    #[test]
    fn test_window_ending_at_last_minute() {
        let slots = partition(&window("22:59-23:59"), 20, 0).unwrap();
        assert_eq!(labels(&slots), ["22:59-23:19", "23:19-23:39", "23:39-23:59"]);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        assert!(partition(&window("00:00-23:59"), u32::MAX, 0).unwrap().is_empty());
        let slots = partition(&window("00:00-23:59"), 60, u32::MAX).unwrap();
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_emitted_slots_follow_cadence_and_count_formula() {
        let windows = ["08:00-12:00", "09:15-10:05", "13:00-13:59", "06:30-18:45"];
        for w in windows {
            let win = window(w);
            for duration in [5, 15, 25, 30, 60, 90] {
                for brk in [0, 5, 10, 45] {
                    let slots = partition(&win, duration, brk).unwrap();

                    assert_eq!(
                        slots.len() as u32,
                        expected_slot_count(win.duration_minutes(), duration, brk),
                        "window {w}, duration {duration}, break {brk}"
                    );
                    if let Some(first) = slots.first() {
                        assert_eq!(first.start, win.start);
                    }
                    for slot in &slots {
                        assert_eq!(slot.duration_minutes(), duration);
                        assert!(slot.end <= win.end);
                    }
                    for pair in slots.windows(2) {
                        assert_eq!(
                            pair[1].start_minute() - pair[0].start_minute(),
                            duration + brk
                        );
                        assert!(!pair[0].overlaps(&pair[1]));
                    }
                }
            }
        }
    }

    #[test]
    fn test_partition_is_deterministic() {
        let win = window("10:00-16:00");
        assert_eq!(partition(&win, 20, 5).unwrap(), partition(&win, 20, 5).unwrap());
    }
}
