//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    engine::GenerationReport,
    models::{Schedule, ScheduleUpsert, Slot},
};

/// Wrapper type for displaying the result of an upsert.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// use jiff::Timestamp;
/// use rota_core::{
///     display::UpsertResult,
///     models::{Schedule, ScheduleUpsert, WeeklyPattern},
/// };
///
/// let schedule = Schedule {
///     id: 1,
///     agent_id: "agent-a".to_string(),
///     org_id: "org-1".to_string(),
///     org_service_id: None,
///     weekly_pattern: WeeklyPattern::new(vec![]).unwrap(),
///     exceptions: BTreeMap::new(),
///     is_active: true,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
/// let result = UpsertResult(ScheduleUpsert { schedule, created: true });
/// assert!(result.to_string().starts_with("Created schedule with ID: 1"));
/// ```
pub struct UpsertResult(pub ScheduleUpsert);

impl fmt::Display for UpsertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.0.created { "Created" } else { "Updated" };
        writeln!(f, "{verb} schedule with ID: {}", self.0.schedule.id)?;
        writeln!(f)?;
        write!(f, "{}", self.0.schedule)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for UpdateResult<Schedule> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated schedule with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Slot> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated slot with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Schedule> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted schedule {} of agent '{}'. Its generated slots were kept.",
            self.resource.id, self.resource.agent_id
        )
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated slots for schedule {} from {} to {}",
            self.schedule_id, self.start_date, self.end_date
        )?;
        writeln!(f)?;
        writeln!(f, "- Created: {}", self.slots_created)?;
        writeln!(f, "- Capacity raised: {}", self.slots_upgraded)?;
        writeln!(f, "- Already present: {}", self.slots_unchanged)?;
        writeln!(
            f,
            "- Days without availability: {}",
            self.days_without_availability
        )
    }
}
