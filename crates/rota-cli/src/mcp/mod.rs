//! MCP server exposing the scheduler as tools.
//!
//! This is the interface used by automated callers, such as a nightly job
//! that keeps the next weeks of slots generated.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use rota_core::Scheduler;
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{
    AddException, AvailableDates, DeleteSchedule, GenerateSlots, Id, ListSchedules, ListSlots,
    McpResult, RemoveException, SetSlotCapacity, UpsertSchedule,
};

const INSTRUCTIONS: &str = r#"Rota manages agent availability and turns it into bookable time slots.

## Core Concepts
- **Schedule**: an agent's weekly working hours inside an organization, optionally scoped to one service. Identified by (org_id, agent_id, org_service_id).
- **Exception**: overrides one date of a schedule. available=false closes the day; available=true with time_ranges replaces the day's hours (an empty list closes the day); available=true without time_ranges keeps the weekly hours.
- **Slot**: a concrete (agent, date, start) time window with a seat capacity and a booked count.

## Typical Workflow
1. `upsert_schedule` with the weekly hours, e.g. monday 09:00-12:00 and 14:00-17:00
2. `add_exception` for holidays or special days
3. `generate_slots` for a date range with a slot duration, break and capacity
4. `list_slots` or `available_dates` to inspect the result

## Guarantees
- Generation is idempotent: running it again for the same range creates nothing new.
- Generation only ever raises the capacity of existing slots; use `set_slot_capacity` to lower it. Booked seats are never touched.
- Generating against an inactive or deleted schedule fails; existing slots are kept.
- Dates are YYYY-MM-DD, times are HH:MM (24h, end exclusive)."#;

#[derive(Clone)]
pub struct RotaMcpServer {
    scheduler: Arc<Scheduler>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RotaMcpServer {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.scheduler.clone())
    }

    #[tool(
        name = "generate_slots",
        description = "Generate slots for a schedule between start_date and end_date (inclusive, YYYY-MM-DD). Each working interval is cut into slots of duration_minutes separated by break_minutes, each with the given capacity (>= 1). Idempotent: existing slots are kept, and their capacity is only ever raised. Returns how many slots were created, upgraded or already present. Fails if the schedule is inactive or missing."
    )]
    async fn generate_slots(&self, params: Parameters<GenerateSlots>) -> McpResult {
        self.handlers().generate_slots(params).await
    }

    #[tool(
        name = "upsert_schedule",
        description = "Create an agent's schedule or replace its weekly hours. The schedule is identified by org_id, agent_id and optional org_service_id. weekly_pattern lists working days (monday..sunday), each with ascending, non-overlapping time_ranges {start: HH:MM, end: HH:MM}. Existing exceptions and slots are not changed."
    )]
    async fn upsert_schedule(&self, params: Parameters<UpsertSchedule>) -> McpResult {
        self.handlers().upsert_schedule(params).await
    }

    #[tool(
        name = "add_exception",
        description = "Add or replace the exception for one date of a schedule. available=false closes the day. available=true with time_ranges replaces the day's hours, and an empty time_ranges list closes it; available=true without time_ranges keeps the weekly hours. An optional reason is shown with the exception."
    )]
    async fn add_exception(&self, params: Parameters<AddException>) -> McpResult {
        self.handlers().add_exception(params).await
    }

    #[tool(
        name = "remove_exception",
        description = "Remove the exception for one date of a schedule, restoring the weekly hours for that date. Does nothing if no exception exists."
    )]
    async fn remove_exception(&self, params: Parameters<RemoveException>) -> McpResult {
        self.handlers().remove_exception(params).await
    }

    #[tool(
        name = "toggle_schedule",
        description = "Activate or deactivate a schedule and report the new state. Inactive schedules refuse slot generation; existing slots are untouched."
    )]
    async fn toggle_schedule(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().toggle_schedule(params).await
    }

    #[tool(
        name = "delete_schedule",
        description = "Permanently delete a schedule and its exceptions. Slots generated from it are kept. Requires confirmed=true. Consider toggle_schedule to deactivate instead."
    )]
    async fn delete_schedule(&self, params: Parameters<DeleteSchedule>) -> McpResult {
        self.handlers().delete_schedule(params).await
    }

    #[tool(
        name = "show_schedule",
        description = "Show a schedule with its weekly hours, activation state and all exceptions."
    )]
    async fn show_schedule(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_schedule(params).await
    }

    #[tool(
        name = "list_schedules",
        description = "List an organization's schedules. With org_service_id, returns schedules for that service plus unscoped schedules that apply to every service. Optionally filter by agent_id or active_only."
    )]
    async fn list_schedules(&self, params: Parameters<ListSchedules>) -> McpResult {
        self.handlers().list_schedules(params).await
    }

    #[tool(
        name = "list_slots",
        description = "List generated slots ordered by date and start time. Filter by schedule_id, agent_id, org_service_id, a from/to date range, or only_open for slots with free seats."
    )]
    async fn list_slots(&self, params: Parameters<ListSlots>) -> McpResult {
        self.handlers().list_slots(params).await
    }

    #[tool(
        name = "available_dates",
        description = "List the dates between start_date and end_date (inclusive) on which a schedule has working hours after applying its exceptions."
    )]
    async fn available_dates(&self, params: Parameters<AvailableDates>) -> McpResult {
        self.handlers().available_dates(params).await
    }

    #[tool(
        name = "set_slot_capacity",
        description = "Change the capacity of one slot. Unlike generation this may lower the capacity, but never below the seats already booked."
    )]
    async fn set_slot_capacity(&self, params: Parameters<SetSlotCapacity>) -> McpResult {
        self.handlers().set_slot_capacity(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for RotaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "rota".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Runs the MCP server on stdio until the client disconnects or a
/// termination signal arrives.
pub async fn run_stdio_server(server: RotaMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Rota MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rota_core::SchedulerBuilder;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_server_registers_all_tools() {
        let temp_dir = TempDir::new().unwrap();
        let scheduler = SchedulerBuilder::new()
            .with_database_path(Some(temp_dir.path().join("mcp.db")))
            .build()
            .await
            .unwrap();

        let server = RotaMcpServer::new(scheduler);
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "add_exception",
                "available_dates",
                "delete_schedule",
                "generate_slots",
                "list_schedules",
                "list_slots",
                "remove_exception",
                "set_slot_capacity",
                "show_schedule",
                "toggle_schedule",
                "upsert_schedule",
            ]
        );
        assert_eq!(server.get_info().server_info.name, "rota");
    }
}
