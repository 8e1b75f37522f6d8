//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can render it with a terminal skin and
//! the MCP server can return it verbatim.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Exception, Schedule, Slot, TimeInterval};

/// Comma-separated `HH:MM-HH:MM` list.
pub(crate) fn fmt_intervals(f: &mut fmt::Formatter<'_>, intervals: &[TimeInterval]) -> fmt::Result {
    for (i, interval) in intervals.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{interval}")?;
    }
    Ok(())
}

impl Schedule {
    fn service_label(&self) -> &str {
        self.org_service_id.as_deref().unwrap_or("all services")
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Schedule {}: {}", self.id, self.agent_id)?;
        writeln!(f)?;

        writeln!(f, "- Organization: {}", self.org_id)?;
        writeln!(f, "- Service: {}", self.service_label())?;
        writeln!(
            f,
            "- Status: {}",
            if self.is_active { "active" } else { "inactive" }
        )?;
        writeln!(f, "- Created: {}", LocalDateTime::new(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime::new(&self.updated_at))?;

        writeln!(f, "\n## Weekly hours")?;
        writeln!(f)?;
        if self.weekly_pattern.is_empty() {
            writeln!(f, "No working days.")?;
        } else {
            for rule in self.weekly_pattern.rules() {
                write!(f, "- **{}**: ", rule.day)?;
                fmt_intervals(f, &rule.intervals)?;
                writeln!(f)?;
            }
        }

        if !self.exceptions.is_empty() {
            writeln!(f, "\n## Exceptions")?;
            writeln!(f)?;
            for exception in self.exceptions.values() {
                write!(f, "{exception}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}**: ", self.date)?;
        match (self.available, self.replacement_hours()) {
            (false, _) => write!(f, "closed")?,
            (true, Some([])) => write!(f, "no hours")?,
            (true, Some(hours)) => fmt_intervals(f, hours)?,
            (true, None) => write!(f, "weekly hours")?,
        }
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### Slot {}: {} {}",
            self.id,
            self.date,
            self.interval()
        )?;
        writeln!(f)?;
        writeln!(f, "- Agent: {}", self.agent_id)?;
        if let Some(service) = &self.org_service_id {
            writeln!(f, "- Service: {service}")?;
        }
        writeln!(f, "- Schedule: {}", self.schedule_id)?;
        writeln!(f, "- Booked: {}/{}", self.booked_count, self.capacity)?;
        writeln!(f, "- Updated: {}", LocalDateTime::new(&self.updated_at))
    }
}
