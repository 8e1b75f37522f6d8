//! Filter types for querying schedules and slots.

use jiff::civil::Date;

use super::time::parse_date;
use crate::{
    error::{Result, SchedulerError},
    params::{ListSchedules, ListSlots},
};

/// Filter options for querying schedules of one organization.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub org_id: String,

    /// Restrict to schedules that cover this service. Unscoped schedules
    /// cover every service and are always included.
    pub org_service_id: Option<String>,

    /// Restrict to one agent
    pub agent_id: Option<String>,

    /// Only schedules that are currently active
    pub active_only: bool,
}

impl From<&ListSchedules> for ScheduleFilter {
    fn from(params: &ListSchedules) -> Self {
        Self {
            org_id: params.org_id.clone(),
            org_service_id: params.org_service_id.clone(),
            agent_id: params.agent_id.clone(),
            active_only: params.active_only,
        }
    }
}

/// Filter options for querying slots.
#[derive(Debug, Clone, Default)]
pub struct SlotFilter {
    pub schedule_id: Option<u64>,
    pub agent_id: Option<String>,

    /// Same inclusion rule as [`ScheduleFilter::org_service_id`]
    pub org_service_id: Option<String>,

    /// Inclusive date bounds
    pub from: Option<Date>,
    pub to: Option<Date>,

    /// Only slots with at least one free seat
    pub only_open: bool,
}

impl TryFrom<&ListSlots> for SlotFilter {
    type Error = SchedulerError;

    /// Parses the wire dates; an inverted range is rejected up front.
    ///
    /// ```rust
    /// use rota_core::{models::SlotFilter, params::ListSlots};
    ///
    /// let params = ListSlots {
    ///     from: Some("2024-01-01".to_string()),
    ///     to: Some("2024-01-07".to_string()),
    ///     only_open: true,
    ///     ..Default::default()
    /// };
    /// let filter = SlotFilter::try_from(&params).unwrap();
    /// assert!(filter.only_open);
    /// assert_eq!(filter.from.unwrap().to_string(), "2024-01-01");
    /// ```
    fn try_from(params: &ListSlots) -> Result<Self> {
        let from = params
            .from
            .as_deref()
            .map(|d| parse_date("from", d))
            .transpose()?;
        let to = params
            .to
            .as_deref()
            .map(|d| parse_date("to", d))
            .transpose()?;

        if let (Some(start), Some(end)) = (from, to) {
            if end < start {
                return Err(SchedulerError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }

        Ok(Self {
            schedule_id: params.schedule_id,
            agent_id: params.agent_id.clone(),
            org_service_id: params.org_service_id.clone(),
            from,
            to,
            only_open: params.only_open,
        })
    }
}
