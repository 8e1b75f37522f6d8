//! MCP tool handlers.
//!
//! Each handler unwraps its parameters, runs the matching [`Scheduler`]
//! operation and returns the markdown rendering of the result as text
//! content.

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use rota_core::{
    display::{Dates, DeleteResult, OperationStatus, Schedules, Slots, UpdateResult, UpsertResult},
    params as core,
    Scheduler, SchedulerError,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::to_mcp_error;

/// Transparent wrapper adding MCP deserialization and schema generation to a
/// core parameter type, so `rota_core::params` stays free of rmcp.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type UpsertSchedule = McpParams<core::UpsertSchedule>;
pub type ListSchedules = McpParams<core::ListSchedules>;
pub type DeleteSchedule = McpParams<core::DeleteSchedule>;
pub type AddException = McpParams<core::AddException>;
pub type RemoveException = McpParams<core::RemoveException>;
pub type GenerateSlots = McpParams<core::GenerateSlots>;
pub type ListSlots = McpParams<core::ListSlots>;
pub type AvailableDates = McpParams<core::AvailableDates>;
pub type SetSlotCapacity = McpParams<core::SetSlotCapacity>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

pub struct McpHandlers {
    scheduler: Arc<Scheduler>,
}

impl McpHandlers {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }

    pub async fn generate_slots(&self, Parameters(params): Parameters<GenerateSlots>) -> McpResult {
        debug!("generate_slots: {params:?}");

        let report = self
            .scheduler
            .generate_slots(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to generate slots", &e))?;
        text(report)
    }

    pub async fn upsert_schedule(
        &self,
        Parameters(params): Parameters<UpsertSchedule>,
    ) -> McpResult {
        debug!("upsert_schedule: {params:?}");

        let upsert = self
            .scheduler
            .upsert_schedule(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to save schedule", &e))?;
        text(UpsertResult(upsert))
    }

    pub async fn add_exception(&self, Parameters(params): Parameters<AddException>) -> McpResult {
        debug!("add_exception: {params:?}");

        let inner = params.as_ref();
        let schedule = self
            .scheduler
            .add_exception(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to add exception", &e))?;
        text(UpdateResult::with_changes(
            schedule,
            vec![format!("Set exception for {}", inner.date)],
        ))
    }

    pub async fn remove_exception(
        &self,
        Parameters(params): Parameters<RemoveException>,
    ) -> McpResult {
        debug!("remove_exception: {params:?}");

        let inner = params.as_ref();
        let removed = self
            .scheduler
            .remove_exception(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to remove exception", &e))?;

        let message = if removed {
            format!(
                "Removed exception for {} from schedule {}",
                inner.date, inner.schedule_id
            )
        } else {
            format!(
                "Schedule {} has no exception for {}; nothing to remove",
                inner.schedule_id, inner.date
            )
        };
        text(OperationStatus::success(message))
    }

    pub async fn toggle_schedule(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("toggle_schedule: {params:?}");

        let id = params.as_ref().id;
        let active = self
            .scheduler
            .toggle_schedule(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to toggle schedule", &e))?;

        let message = if active {
            format!("Schedule {id} is now active")
        } else {
            format!("Schedule {id} is now inactive. Slot generation will be refused until it is reactivated.")
        };
        text(OperationStatus::success(message))
    }

    pub async fn delete_schedule(
        &self,
        Parameters(params): Parameters<DeleteSchedule>,
    ) -> McpResult {
        debug!("delete_schedule: {params:?}");

        let schedule = self
            .scheduler
            .delete_schedule(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete schedule", &e))?;
        text(DeleteResult::new(schedule))
    }

    pub async fn show_schedule(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_schedule: {params:?}");

        let id = params.as_ref().id;
        let schedule = self
            .scheduler
            .get_schedule(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to load schedule", &e))?
            .ok_or_else(|| {
                to_mcp_error(
                    "Failed to load schedule",
                    &SchedulerError::ScheduleNotFound { id },
                )
            })?;
        text(schedule)
    }

    pub async fn list_schedules(
        &self,
        Parameters(params): Parameters<ListSchedules>,
    ) -> McpResult {
        debug!("list_schedules: {params:?}");

        let schedules = self
            .scheduler
            .list_schedules(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list schedules", &e))?;
        text(format!(
            "# Schedules of {}\n\n{}",
            params.as_ref().org_id,
            Schedules(schedules)
        ))
    }

    pub async fn list_slots(&self, Parameters(params): Parameters<ListSlots>) -> McpResult {
        debug!("list_slots: {params:?}");

        let slots = self
            .scheduler
            .list_slots(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list slots", &e))?;
        text(Slots(slots))
    }

    pub async fn available_dates(
        &self,
        Parameters(params): Parameters<AvailableDates>,
    ) -> McpResult {
        debug!("available_dates: {params:?}");

        let dates = self
            .scheduler
            .available_dates(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to compute available dates", &e))?;
        text(Dates(dates))
    }

    pub async fn set_slot_capacity(
        &self,
        Parameters(params): Parameters<SetSlotCapacity>,
    ) -> McpResult {
        debug!("set_slot_capacity: {params:?}");

        let slot = self
            .scheduler
            .set_slot_capacity(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to change slot capacity", &e))?;
        let change = format!("Capacity set to {}", params.as_ref().capacity);
        text(UpdateResult::with_changes(slot, vec![change]))
    }
}
