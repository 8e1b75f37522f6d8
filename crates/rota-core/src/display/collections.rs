//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use jiff::civil::Date;

use super::models::fmt_intervals;
use crate::models::{Schedule, Slot, WeekdayKey};

/// Newtype wrapper for displaying a list of schedules as compact summaries.
///
/// # Examples
///
/// ```rust
/// use rota_core::display::Schedules;
///
/// let empty = Schedules(vec![]);
/// assert_eq!(empty.to_string(), "No schedules found.\n");
/// ```
pub struct Schedules(pub Vec<Schedule>);

impl Schedules {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Schedule> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Schedules {
    type Item = &'a Schedule;
    type IntoIter = std::slice::Iter<'a, Schedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Schedules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No schedules found.");
        }

        for schedule in &self.0 {
            writeln!(
                f,
                "## {} (ID: {}){}",
                schedule.agent_id,
                schedule.id,
                if schedule.is_active { "" } else { " [inactive]" }
            )?;
            writeln!(f)?;
            writeln!(
                f,
                "- **Service**: {}",
                schedule.org_service_id.as_deref().unwrap_or("all services")
            )?;

            if schedule.weekly_pattern.is_empty() {
                writeln!(f, "- **Days**: none")?;
            } else {
                for rule in schedule.weekly_pattern.rules() {
                    write!(f, "- **{}**: ", rule.day)?;
                    fmt_intervals(f, &rule.intervals)?;
                    writeln!(f)?;
                }
            }
            if !schedule.exceptions.is_empty() {
                writeln!(f, "- **Exceptions**: {}", schedule.exceptions.len())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying slots as a markdown table.
pub struct Slots(pub Vec<Slot>);

impl Slots {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.0.iter()
    }
}

impl fmt::Display for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No slots found.");
        }

        writeln!(f, "| ID | Date | Time | Agent | Service | Booked |")?;
        writeln!(f, "|---:|------|------|-------|---------|-------:|")?;
        for slot in &self.0 {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | {}/{} |",
                slot.id,
                slot.date,
                slot.interval(),
                slot.agent_id,
                slot.org_service_id.as_deref().unwrap_or("-"),
                slot.booked_count,
                slot.capacity
            )?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a list of calendar dates, shown with their weekday.
pub struct Dates(pub Vec<Date>);

impl fmt::Display for Dates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No available dates.");
        }
        for date in &self.0 {
            writeln!(f, "- {date} ({})", WeekdayKey::of(*date))?;
        }
        Ok(())
    }
}
