//! Schedule model definition.

use std::collections::BTreeMap;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Exception, WeeklyPattern};

/// An agent's availability, owned by an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    /// Unique identifier for the schedule
    pub id: u64,

    /// Agent (organization membership) the schedule belongs to
    pub agent_id: String,

    /// Owning organization
    pub org_id: String,

    /// Service the schedule is restricted to; `None` covers every service
    pub org_service_id: Option<String>,

    /// Recurring weekly hours
    pub weekly_pattern: WeeklyPattern,

    /// Date-specific overrides keyed by date
    #[serde(default)]
    pub exceptions: BTreeMap<Date, Exception>,

    /// Inactive schedules are skipped by slot generation
    pub is_active: bool,

    /// Timestamp when the schedule was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the schedule was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Schedule {
    pub fn exception_for(&self, date: Date) -> Option<&Exception> {
        self.exceptions.get(&date)
    }

    /// Whether the schedule covers the given service: either it is scoped to
    /// it, or it is not scoped at all.
    pub fn applies_to_service(&self, org_service_id: &str) -> bool {
        self.org_service_id
            .as_deref()
            .is_none_or(|scoped| scoped == org_service_id)
    }
}

/// Result of an upsert: the stored schedule and whether it was new.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleUpsert {
    pub schedule: Schedule,
    pub created: bool,
}
