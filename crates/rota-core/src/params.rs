//! Parameter structures for scheduling operations.
//!
//! These are the wire-level shapes shared by every interface (CLI, MCP). They
//! carry dates and times as ISO-8601 strings and numbers as signed integers so
//! that malformed or negative input reaches the core and is rejected there
//! with a typed error, rather than failing inside a framework's decoder.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (this module)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Interface layers wrap or convert into these structs; JSON schema derives
//! are only compiled with the `schema` feature.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SchedulerError},
    models::{parse_date, parse_time, DayRule, Exception, TimeInterval, WeekdayKey, WeeklyPattern},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// A time range on the wire, `HH:MM` to `HH:MM`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TimeRange {
    /// Start time, `HH:MM`
    pub start: String,
    /// End time, `HH:MM` (exclusive)
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl TryFrom<&TimeRange> for TimeInterval {
    type Error = SchedulerError;

    fn try_from(range: &TimeRange) -> Result<Self> {
        TimeInterval::new(
            parse_time("start", &range.start)?,
            parse_time("end", &range.end)?,
        )
    }
}

/// Working hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DaySchedule {
    /// Weekday name (monday … sunday)
    pub day: WeekdayKey,
    /// Ascending, non-overlapping time ranges for the day
    #[serde(default)]
    pub time_ranges: Vec<TimeRange>,
}

/// Parameters for creating or replacing a schedule's weekly pattern.
///
/// A schedule is identified by (org, agent, service); an existing match gets
/// its weekly pattern replaced, otherwise a new active schedule is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpsertSchedule {
    /// Organization owning the schedule
    pub org_id: String,
    /// Agent the schedule belongs to
    pub agent_id: String,
    /// Optional service scope; omit to cover every service
    #[serde(default)]
    pub org_service_id: Option<String>,
    /// Weekly working hours, one entry per working weekday
    #[serde(default)]
    pub weekly_pattern: Vec<DaySchedule>,
}

impl UpsertSchedule {
    /// Builds the validated weekly pattern.
    pub fn pattern(&self) -> Result<WeeklyPattern> {
        let rules = self
            .weekly_pattern
            .iter()
            .map(|day| {
                let intervals = day
                    .time_ranges
                    .iter()
                    .map(TimeInterval::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(DayRule::new(day.day, intervals))
            })
            .collect::<Result<Vec<_>>>()?;
        WeeklyPattern::new(rules)
    }
}

/// Parameters for adding (or replacing) the exception of one date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddException {
    /// Schedule to modify
    pub schedule_id: u64,
    /// Date of the exception, `YYYY-MM-DD`
    pub date: String,
    /// `false` closes the day; `true` keeps it open
    pub available: bool,
    /// Replacement hours for an open day; omit to keep the weekly hours.
    /// An empty list leaves the day without hours.
    #[serde(default)]
    pub time_ranges: Option<Vec<TimeRange>>,
    /// Free-text reason (holiday, training, …)
    #[serde(default)]
    pub reason: Option<String>,
}

impl AddException {
    /// Builds the normalized exception (without validating overlap).
    pub fn exception(&self) -> Result<Exception> {
        let date = parse_date("date", &self.date)?;
        let intervals = match (&self.time_ranges, self.available) {
            (Some(ranges), true) => Some(
                ranges
                    .iter()
                    .map(TimeInterval::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            _ => None,
        };
        Ok(Exception {
            date,
            available: self.available,
            intervals,
            reason: self.reason.clone(),
        }
        .normalized())
    }
}

/// Parameters for removing the exception of one date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RemoveException {
    /// Schedule to modify
    pub schedule_id: u64,
    /// Date of the exception to remove, `YYYY-MM-DD`
    pub date: String,
}

/// Parameters for permanently deleting a schedule.
///
/// Requires explicit confirmation. Slots generated from the schedule are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteSchedule {
    /// The ID of the schedule to delete
    pub id: u64,
    /// Confirmation flag - must be true to proceed with deletion
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for listing an organization's schedules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListSchedules {
    /// Organization to list
    pub org_id: String,
    /// Only schedules covering this service (unscoped schedules included)
    #[serde(default)]
    pub org_service_id: Option<String>,
    /// Only schedules of this agent
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Skip deactivated schedules
    #[serde(default)]
    pub active_only: bool,
}

/// Parameters for generating slots from a schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GenerateSlots {
    /// Schedule to generate from
    pub schedule_id: u64,
    /// First date, inclusive, `YYYY-MM-DD`
    pub start_date: String,
    /// Last date, inclusive, `YYYY-MM-DD`
    pub end_date: String,
    /// Length of each slot in minutes (> 0)
    pub duration_minutes: i64,
    /// Gap between consecutive slots in minutes (>= 0)
    #[serde(default)]
    pub break_minutes: i64,
    /// Seats per slot (>= 1)
    pub capacity: i64,
}

/// Parameters for listing generated slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListSlots {
    /// Only slots generated from this schedule
    #[serde(default)]
    pub schedule_id: Option<u64>,
    /// Only slots of this agent
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Only slots usable for this service (unscoped slots included)
    #[serde(default)]
    pub org_service_id: Option<String>,
    /// First date, inclusive, `YYYY-MM-DD`
    #[serde(default)]
    pub from: Option<String>,
    /// Last date, inclusive, `YYYY-MM-DD`
    #[serde(default)]
    pub to: Option<String>,
    /// Only slots with free seats
    #[serde(default)]
    pub only_open: bool,
}

/// Parameters for finding the dates on which a schedule is available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AvailableDates {
    /// Schedule to inspect
    pub schedule_id: u64,
    /// First date, inclusive, `YYYY-MM-DD`
    pub start_date: String,
    /// Last date, inclusive, `YYYY-MM-DD`
    pub end_date: String,
}

/// Parameters for the slot-edit path that changes a slot's capacity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetSlotCapacity {
    /// Slot to edit
    pub slot_id: u64,
    /// New capacity; may not drop below the booked seats
    pub capacity: i64,
}
