//! Slot generation and slot store operations for the Scheduler.

use jiff::civil::Date;

use super::Scheduler;
use crate::{
    engine::{self, GenerationReport, GenerationRequest},
    error::{Result, SchedulerError},
    models::{parse_date, Slot, SlotFilter},
    params::{AvailableDates, GenerateSlots, Id, ListSlots, SetSlotCapacity},
};

impl Scheduler {
    /// Expands a schedule over a date range into slots.
    ///
    /// The schedule is loaded fresh and every candidate is reconciled on its
    /// own, so concurrent runs over overlapping ranges never duplicate a
    /// slot and re-running a finished range creates nothing.
    ///
    /// # Errors
    ///
    /// In order of precedence: `ScheduleInactiveOrMissing`,
    /// `InvalidDateRange`, `InvalidParameter`; then any storage failure that
    /// outlasted the configured retries.
    pub async fn generate_slots(&self, params: &GenerateSlots) -> Result<GenerationReport> {
        let params = params.clone();
        self.with_database(move |db| {
            let schedule = db.get_schedule(params.schedule_id)?;
            let request = GenerationRequest::validate(schedule.as_ref(), &params)?;
            match schedule {
                Some(schedule) => engine::generate(&schedule, &request, db),
                None => Err(SchedulerError::ScheduleInactiveOrMissing {
                    id: params.schedule_id,
                }),
            }
        })
        .await
    }

    /// Lists slots matching the given filters.
    pub async fn list_slots(&self, params: &ListSlots) -> Result<Vec<Slot>> {
        let filter = SlotFilter::try_from(params)?;
        self.with_database(move |db| db.list_slots(&filter)).await
    }

    /// Retrieves a slot by its ID.
    pub async fn get_slot(&self, params: &Id) -> Result<Option<Slot>> {
        let id = params.id;
        self.with_database(move |db| db.get_slot(id)).await
    }

    /// Dates in the range on which the schedule has open hours.
    pub async fn available_dates(&self, params: &AvailableDates) -> Result<Vec<Date>> {
        let start = parse_date("start_date", &params.start_date)?;
        let end = parse_date("end_date", &params.end_date)?;
        if end < start {
            return Err(SchedulerError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let id = params.schedule_id;
        self.with_database(move |db| {
            let schedule = db
                .get_schedule(id)?
                .ok_or(SchedulerError::ScheduleNotFound { id })?;
            Ok(engine::available_dates(&schedule, start, end))
        })
        .await
    }

    /// Slot-edit path: sets a slot's capacity, which may lower it but never
    /// below the seats already booked.
    pub async fn set_slot_capacity(&self, params: &SetSlotCapacity) -> Result<Slot> {
        if params.capacity < 1 {
            return Err(SchedulerError::invalid_parameter("capacity")
                .with_reason(format!("must be at least 1, got {}", params.capacity)));
        }
        let capacity = u32::try_from(params.capacity).map_err(|_| {
            SchedulerError::invalid_parameter("capacity")
                .with_reason(format!("{} is too large", params.capacity))
        })?;

        let slot_id = params.slot_id;
        self.with_database(move |db| db.set_slot_capacity(slot_id, capacity))
            .await
    }

    /// Books one seat if any is free.
    pub async fn claim_seat(&self, params: &Id) -> Result<bool> {
        let id = params.id;
        self.with_database(move |db| db.claim_seat(id)).await
    }

    /// Frees one booked seat.
    pub async fn release_seat(&self, params: &Id) -> Result<bool> {
        let id = params.id;
        self.with_database(move |db| db.release_seat(id)).await
    }
}
