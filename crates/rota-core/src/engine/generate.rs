//! Slot generation: expanding a schedule over a date range into slots.

use jiff::civil::Date;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    partition::partition,
    resolve::{dates_between, resolve},
};
use crate::{
    error::{Result, SchedulerError},
    models::{parse_date, Reconciliation, Schedule, SlotCandidate},
    params::GenerateSlots,
};

/// Persistence seam for generated slots.
///
/// Implementations must reconcile each candidate atomically against the
/// `(agent_id, date, start)` key: insert when absent, raise capacity when the
/// existing slot has less, otherwise leave the slot untouched. Booked counts
/// are never modified by reconciliation.
pub trait SlotStore {
    /// Reconcile a single candidate slot
    fn reconcile(&mut self, candidate: &SlotCandidate) -> Result<Reconciliation>;
}

/// Validated slot shape shared by every date of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    pub duration_minutes: u32,
    pub break_minutes: u32,
    pub capacity: u32,
}

impl SlotLayout {
    /// Checks the raw wire values: duration > 0, break >= 0, capacity >= 1.
    pub fn new(duration_minutes: i64, break_minutes: i64, capacity: i64) -> Result<Self> {
        Ok(Self {
            duration_minutes: bounded("duration_minutes", duration_minutes, 1)?,
            break_minutes: bounded("break_minutes", break_minutes, 0)?,
            capacity: bounded("capacity", capacity, 1)?,
        })
    }
}

fn bounded(field: &str, value: i64, min: i64) -> Result<u32> {
    if value < min {
        return Err(SchedulerError::invalid_parameter(field)
            .with_reason(format!("must be at least {min}, got {value}")));
    }
    u32::try_from(value).map_err(|_| {
        SchedulerError::invalid_parameter(field).with_reason(format!("{value} is too large"))
    })
}

/// A generation run whose preconditions have all been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub schedule_id: u64,
    pub start_date: Date,
    pub end_date: Date,
    pub layout: SlotLayout,
}

impl GenerationRequest {
    /// Validates a generation call against the schedule it targets.
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// the schedule must exist and be active, then the date range must not be
    /// inverted, then the slot layout must be valid.
    pub fn validate(schedule: Option<&Schedule>, params: &GenerateSlots) -> Result<Self> {
        match schedule {
            Some(schedule) if schedule.is_active => {}
            _ => {
                return Err(SchedulerError::ScheduleInactiveOrMissing {
                    id: params.schedule_id,
                })
            }
        }

        let start_date = parse_date("start_date", &params.start_date)?;
        let end_date = parse_date("end_date", &params.end_date)?;
        if end_date < start_date {
            return Err(SchedulerError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        let layout = SlotLayout::new(
            params.duration_minutes,
            params.break_minutes,
            params.capacity,
        )?;

        Ok(Self {
            schedule_id: params.schedule_id,
            start_date,
            end_date,
            layout,
        })
    }
}

/// Counts of what a generation run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub schedule_id: u64,
    pub start_date: Date,
    pub end_date: Date,
    /// Slots inserted by this run
    pub slots_created: u32,
    /// Existing slots whose capacity was raised
    pub slots_upgraded: u32,
    /// Existing slots left as they were
    pub slots_unchanged: u32,
    /// Dates in the range that resolved to no open hours
    pub days_without_availability: u32,
}

impl GenerationReport {
    fn empty(request: &GenerationRequest) -> Self {
        Self {
            schedule_id: request.schedule_id,
            start_date: request.start_date,
            end_date: request.end_date,
            slots_created: 0,
            slots_upgraded: 0,
            slots_unchanged: 0,
            days_without_availability: 0,
        }
    }

    /// Every candidate the run reconciled, whatever the outcome.
    pub fn slots_considered(&self) -> u32 {
        self.slots_created
            .saturating_add(self.slots_upgraded)
            .saturating_add(self.slots_unchanged)
    }

    // Counters saturate instead of wrapping on very long ranges.
    fn record(&mut self, outcome: Reconciliation) {
        let counter = match outcome {
            Reconciliation::Created => &mut self.slots_created,
            Reconciliation::Upgraded { .. } => &mut self.slots_upgraded,
            Reconciliation::Unchanged => &mut self.slots_unchanged,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Candidate slots for one date, in ascending start order.
pub fn candidates_for_day(
    schedule: &Schedule,
    date: Date,
    layout: &SlotLayout,
) -> Result<Vec<SlotCandidate>> {
    let mut candidates = Vec::new();
    for window in resolve(schedule, date) {
        for interval in partition(window, layout.duration_minutes, layout.break_minutes)? {
            candidates.push(SlotCandidate {
                schedule_id: schedule.id,
                agent_id: schedule.agent_id.clone(),
                org_service_id: schedule.org_service_id.clone(),
                date,
                interval,
                capacity: layout.capacity,
            });
        }
    }
    Ok(candidates)
}

/// Expands `schedule` over the request's date range and reconciles every
/// candidate against `store`.
///
/// Re-running with the same inputs creates nothing new. A store failure
/// aborts the run; slots reconciled before the failure stay in place.
pub fn generate<S: SlotStore + ?Sized>(
    schedule: &Schedule,
    request: &GenerationRequest,
    store: &mut S,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::empty(request);

    for date in dates_between(request.start_date, request.end_date) {
        let candidates = candidates_for_day(schedule, date, &request.layout)?;
        if candidates.is_empty() {
            report.days_without_availability = report.days_without_availability.saturating_add(1);
            continue;
        }

        debug!(
            "Schedule {}: reconciling {} candidate slots on {date}",
            schedule.id,
            candidates.len()
        );
        for candidate in &candidates {
            report.record(store.reconcile(candidate)?);
        }
    }

    info!(
        "Schedule {} generated {}..{}: {} created, {} upgraded, {} unchanged, {} closed days",
        schedule.id,
        report.start_date,
        report.end_date,
        report.slots_created,
        report.slots_upgraded,
        report.slots_unchanged,
        report.days_without_availability
    );
    Ok(report)
}
