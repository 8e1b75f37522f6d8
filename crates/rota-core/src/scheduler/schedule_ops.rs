//! Schedule and exception operations for the Scheduler.

use log::info;

use super::Scheduler;
use crate::{
    config::OpenExceptionPolicy,
    error::{Result, SchedulerError},
    models::{parse_date, Schedule, ScheduleFilter, ScheduleUpsert},
    params::{AddException, DeleteSchedule, Id, ListSchedules, RemoveException, UpsertSchedule},
};

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SchedulerError::invalid_parameter(field).with_reason("must not be empty"));
    }
    Ok(())
}

impl Scheduler {
    /// Creates the schedule for (org, agent, service) or replaces the weekly
    /// pattern of the one that already exists.
    ///
    /// # Errors
    ///
    /// `OverlappingIntervals` for overlapping or unsorted ranges within a
    /// day, `InvalidParameter` for malformed times, a duplicate weekday or
    /// empty identifiers.
    pub async fn upsert_schedule(&self, params: &UpsertSchedule) -> Result<ScheduleUpsert> {
        require_text("org_id", &params.org_id)?;
        require_text("agent_id", &params.agent_id)?;
        let pattern = params.pattern()?;

        let org_id = params.org_id.clone();
        let agent_id = params.agent_id.clone();
        let service = params.org_service_id.clone();

        let upsert = self
            .with_database(move |db| {
                db.upsert_schedule(&org_id, &agent_id, service.as_deref(), &pattern)
            })
            .await?;

        info!(
            "{} schedule {} for agent {}",
            if upsert.created { "Created" } else { "Updated" },
            upsert.schedule.id,
            upsert.schedule.agent_id
        );
        Ok(upsert)
    }

    /// Retrieves a schedule with its exceptions.
    pub async fn get_schedule(&self, params: &Id) -> Result<Option<Schedule>> {
        let id = params.id;
        self.with_database(move |db| db.get_schedule(id)).await
    }

    /// Lists an organization's schedules. With a service filter, unscoped
    /// schedules are included because they cover every service.
    pub async fn list_schedules(&self, params: &ListSchedules) -> Result<Vec<Schedule>> {
        require_text("org_id", &params.org_id)?;
        let filter = ScheduleFilter::from(params);
        self.with_database(move |db| db.list_schedules(&filter)).await
    }

    /// Every schedule one agent has within an organization.
    pub async fn schedules_for_agent(&self, org_id: &str, agent_id: &str) -> Result<Vec<Schedule>> {
        self.list_schedules(&ListSchedules {
            org_id: org_id.to_string(),
            agent_id: Some(agent_id.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Flips a schedule between active and inactive; returns the new state.
    /// Existing slots are not touched.
    pub async fn toggle_schedule(&self, params: &Id) -> Result<bool> {
        let id = params.id;
        let is_active = self.with_database(move |db| db.toggle_schedule(id)).await?;
        info!(
            "Schedule {id} is now {}",
            if is_active { "active" } else { "inactive" }
        );
        Ok(is_active)
    }

    /// Adds the exception for a date, replacing any earlier one for the same
    /// date. Returns the updated schedule.
    ///
    /// Under [`OpenExceptionPolicy::Reject`], an open exception without
    /// replacement hours is refused.
    pub async fn add_exception(&self, params: &AddException) -> Result<Schedule> {
        let exception = params.exception()?;
        exception.validate()?;

        if exception.is_open_without_hours()
            && self.config.generation.open_exception_policy == OpenExceptionPolicy::Reject
        {
            return Err(SchedulerError::invalid_parameter("time_ranges").with_reason(
                "an available exception must list its hours under the reject policy",
            ));
        }

        let schedule_id = params.schedule_id;
        let schedule = self
            .with_database(move |db| db.add_exception(schedule_id, &exception))
            .await?;

        info!("Schedule {schedule_id}: exception set for {}", params.date);
        Ok(schedule)
    }

    /// Removes the exception for a date. Returns whether one existed.
    pub async fn remove_exception(&self, params: &RemoveException) -> Result<bool> {
        let date = parse_date("date", &params.date)?;
        let schedule_id = params.schedule_id;

        let removed = self
            .with_database(move |db| db.remove_exception(schedule_id, date))
            .await?;
        if removed {
            info!("Schedule {schedule_id}: exception removed for {date}");
        }
        Ok(removed)
    }

    /// Permanently deletes a schedule and its exceptions; its slots stay.
    /// Returns the deleted schedule.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `confirmed` is false, `ScheduleNotFound` if the
    /// schedule does not exist.
    pub async fn delete_schedule(&self, params: &DeleteSchedule) -> Result<Schedule> {
        if !params.confirmed {
            return Err(SchedulerError::invalid_parameter("confirmed").with_reason(
                "Schedule deletion requires explicit confirmation. Set 'confirmed' to true to proceed.",
            ));
        }

        let id = params.id;
        let schedule = self
            .with_database(move |db| {
                let schedule = db
                    .get_schedule(id)?
                    .ok_or(SchedulerError::ScheduleNotFound { id })?;
                db.delete_schedule(id)?;
                Ok(schedule)
            })
            .await?;

        info!("Deleted schedule {id}");
        Ok(schedule)
    }
}
