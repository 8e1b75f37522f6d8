//! Weekly recurring availability.

use serde::{Deserialize, Serialize};

use super::{TimeInterval, WeekdayKey};
use crate::error::{Result, SchedulerError};

/// Working intervals for one weekday; several intervals model split shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRule {
    pub day: WeekdayKey,
    pub intervals: Vec<TimeInterval>,
}

impl DayRule {
    pub fn new(day: WeekdayKey, intervals: Vec<TimeInterval>) -> Self {
        Self { day, intervals }
    }
}

/// Week-periodic availability template, at most one [`DayRule`] per weekday.
///
/// Construction validates every rule, so a `WeeklyPattern` value always holds
/// ascending, non-overlapping intervals. Deserialization goes through the same
/// check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayRule>", into = "Vec<DayRule>")]
pub struct WeeklyPattern {
    rules: Vec<DayRule>,
}

impl WeeklyPattern {
    /// Validates and normalizes the rules (ordered Monday to Sunday).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when a weekday appears twice, `OverlappingIntervals`
    /// when a rule's intervals overlap or are not ascending.
    pub fn new(mut rules: Vec<DayRule>) -> Result<Self> {
        rules.sort_by_key(|rule| rule.day);
        for pair in rules.windows(2) {
            if pair[0].day == pair[1].day {
                return Err(SchedulerError::invalid_parameter("weekly_pattern")
                    .with_reason(format!("{} is listed more than once", pair[0].day)));
            }
        }
        for rule in &rules {
            validate_intervals(rule.day.as_str(), &rule.intervals)?;
        }
        Ok(Self { rules })
    }

    /// Intervals configured for the weekday, empty when the day is off.
    pub fn intervals_for(&self, day: WeekdayKey) -> &[TimeInterval] {
        self.rules
            .iter()
            .find(|rule| rule.day == day)
            .map(|rule| rule.intervals.as_slice())
            .unwrap_or_default()
    }

    pub fn rules(&self) -> &[DayRule] {
        &self.rules
    }

    /// Weekdays with at least one working interval.
    pub fn working_days(&self) -> impl Iterator<Item = WeekdayKey> + '_ {
        self.rules
            .iter()
            .filter(|rule| !rule.intervals.is_empty())
            .map(|rule| rule.day)
    }

    pub fn is_empty(&self) -> bool {
        self.working_days().next().is_none()
    }
}

impl TryFrom<Vec<DayRule>> for WeeklyPattern {
    type Error = SchedulerError;

    fn try_from(rules: Vec<DayRule>) -> Result<Self> {
        Self::new(rules)
    }
}

impl From<WeeklyPattern> for Vec<DayRule> {
    fn from(pattern: WeeklyPattern) -> Self {
        pattern.rules
    }
}

/// Checks that intervals are strictly ascending and pairwise disjoint.
///
/// Touching intervals (`a.end == b.start`) are accepted. `context` names the
/// day or date in the error.
pub fn validate_intervals(context: &str, intervals: &[TimeInterval]) -> Result<()> {
    for pair in intervals.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.overlaps(second) || second.start < first.start {
            return Err(SchedulerError::OverlappingIntervals {
                context: context.to_string(),
                first: first.to_string(),
                second: second.to_string(),
            });
        }
    }
    Ok(())
}
