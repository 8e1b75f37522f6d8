//! Command-line interface definitions and command handlers.
//!
//! Arguments are parsed with clap derives into small `*Args` structs which
//! are then converted into the interface-agnostic parameter types of
//! [`rota_core::params`]:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Scheduler → Display wrapper → Renderer
//! ```
//!
//! Times and dates stay strings until they reach the core, so malformed input
//! is reported with the same typed error the MCP server returns.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use rota_core::{
    config::GenerationConfig,
    display::{
        Dates, DeleteResult, OperationStatus, Schedules, Slots, UpdateResult, UpsertResult,
    },
    models::WeekdayKey,
    params::{
        AddException, AvailableDates, DaySchedule, DeleteSchedule, GenerateSlots, Id,
        ListSchedules, ListSlots, RemoveException, SetSlotCapacity, TimeRange, UpsertSchedule,
    },
    Scheduler,
};

use crate::renderer::TerminalRenderer;

/// Parses `HH:MM-HH:MM` into a wire time range.
///
/// Only the shape is checked here; the times themselves are validated by the
/// core.
pub fn parse_time_range(value: &str) -> std::result::Result<TimeRange, String> {
    let (start, end) = value
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("Invalid time range '{value}', expected HH:MM-HH:MM"))?;
    Ok(TimeRange::new(start.trim(), end.trim()))
}

/// Parses `monday=09:00-12:00,14:00-17:00` into one weekday's hours.
pub fn parse_day_schedule(value: &str) -> std::result::Result<DaySchedule, String> {
    let (day, ranges) = value
        .split_once('=')
        .ok_or_else(|| format!("Invalid day '{value}', expected DAY=HH:MM-HH:MM[,...]"))?;
    let day: WeekdayKey = day.parse()?;
    let time_ranges = ranges
        .split(',')
        .filter(|range| !range.trim().is_empty())
        .map(parse_time_range)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(DaySchedule { day, time_ranges })
}

/// Create a schedule or replace its weekly hours
///
/// A schedule is identified by organization, agent and optional service.
/// When one already exists its weekly hours are replaced; its exceptions,
/// activation state and generated slots are left alone.
#[derive(Args)]
pub struct UpsertScheduleArgs {
    #[arg(long, help = "Organization owning the schedule")]
    pub org: String,
    #[arg(long, help = "Agent the schedule belongs to")]
    pub agent: String,
    #[arg(long, help = "Restrict the schedule to one service")]
    pub service: Option<String>,
    #[arg(
        long = "day",
        value_parser = parse_day_schedule,
        help = "Working hours of one weekday, e.g. monday=09:00-12:00,14:00-17:00 (repeatable)"
    )]
    pub days: Vec<DaySchedule>,
}

impl From<UpsertScheduleArgs> for UpsertSchedule {
    fn from(val: UpsertScheduleArgs) -> Self {
        UpsertSchedule {
            org_id: val.org,
            agent_id: val.agent,
            org_service_id: val.service,
            weekly_pattern: val.days,
        }
    }
}

/// List an organization's schedules
#[derive(Args)]
pub struct ListSchedulesArgs {
    #[arg(long, help = "Organization to list")]
    pub org: String,
    #[arg(
        long,
        help = "Only schedules covering this service (unscoped schedules included)"
    )]
    pub service: Option<String>,
    #[arg(long, help = "Only schedules of this agent")]
    pub agent: Option<String>,
    #[arg(long, help = "Skip deactivated schedules")]
    pub active: bool,
}

impl From<ListSchedulesArgs> for ListSchedules {
    fn from(val: ListSchedulesArgs) -> Self {
        ListSchedules {
            org_id: val.org,
            org_service_id: val.service,
            agent_id: val.agent,
            active_only: val.active,
        }
    }
}

#[derive(Args)]
pub struct ScheduleIdArgs {
    #[arg(help = "Unique identifier of the schedule")]
    pub id: u64,
}

impl From<ScheduleIdArgs> for Id {
    fn from(val: ScheduleIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Permanently delete a schedule
///
/// Removes the schedule and its exceptions. Slots already generated from it
/// are kept. Requires `--confirm`.
#[derive(Args)]
pub struct DeleteScheduleArgs {
    #[arg(help = "Unique identifier of the schedule to delete")]
    pub id: u64,
    #[arg(long, help = "Confirm the deletion")]
    pub confirm: bool,
}

impl From<DeleteScheduleArgs> for DeleteSchedule {
    fn from(val: DeleteScheduleArgs) -> Self {
        DeleteSchedule {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Create a schedule or replace its weekly hours
    #[command(alias = "u")]
    Upsert(UpsertScheduleArgs),
    /// List an organization's schedules
    #[command(alias = "l")]
    List(ListSchedulesArgs),
    /// Show a schedule with its exceptions
    #[command(alias = "s")]
    Show(ScheduleIdArgs),
    /// Activate or deactivate a schedule
    #[command(alias = "t")]
    Toggle(ScheduleIdArgs),
    /// Permanently delete a schedule (slots are kept)
    Delete(DeleteScheduleArgs),
}

/// Add or replace the exception of one date
///
/// Without flags the day stays open with its weekly hours. `--closed` makes
/// the agent unavailable for the whole day; `--hours` replaces the day's
/// hours entirely.
#[derive(Args)]
pub struct AddExceptionArgs {
    #[arg(help = "Schedule to modify")]
    pub schedule_id: u64,
    #[arg(help = "Date of the exception (YYYY-MM-DD)")]
    pub date: String,
    #[arg(long, conflicts_with = "hours", help = "Close the day")]
    pub closed: bool,
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_time_range,
        help = "Replacement hours as comma-separated HH:MM-HH:MM ranges"
    )]
    pub hours: Option<Vec<TimeRange>>,
    #[arg(long, help = "Reason shown with the exception")]
    pub reason: Option<String>,
}

impl From<AddExceptionArgs> for AddException {
    fn from(val: AddExceptionArgs) -> Self {
        AddException {
            schedule_id: val.schedule_id,
            date: val.date,
            available: !val.closed,
            time_ranges: val.hours,
            reason: val.reason,
        }
    }
}

#[derive(Args)]
pub struct RemoveExceptionArgs {
    #[arg(help = "Schedule to modify")]
    pub schedule_id: u64,
    #[arg(help = "Date of the exception to remove (YYYY-MM-DD)")]
    pub date: String,
}

impl From<RemoveExceptionArgs> for RemoveException {
    fn from(val: RemoveExceptionArgs) -> Self {
        RemoveException {
            schedule_id: val.schedule_id,
            date: val.date,
        }
    }
}

#[derive(Subcommand)]
pub enum ExceptionCommands {
    /// Add or replace the exception of one date
    #[command(alias = "a")]
    Add(AddExceptionArgs),
    /// Remove the exception of one date
    #[command(alias = "rm")]
    Remove(RemoveExceptionArgs),
}

/// Generate slots from a schedule over a date range
///
/// Running the same generation twice creates nothing new; a larger
/// `--capacity` raises the capacity of existing slots, a smaller one leaves
/// them alone. Omitted layout options come from the configuration file.
#[derive(Args)]
pub struct GenerateSlotsArgs {
    #[arg(help = "Schedule to generate from")]
    pub schedule_id: u64,
    #[arg(long, help = "First date, inclusive (YYYY-MM-DD)")]
    pub from: String,
    #[arg(long, help = "Last date, inclusive (YYYY-MM-DD)")]
    pub to: String,
    #[arg(long, help = "Slot length in minutes")]
    pub duration: Option<i64>,
    #[arg(long = "break", help = "Gap between consecutive slots in minutes")]
    pub break_minutes: Option<i64>,
    #[arg(long, help = "Seats per slot")]
    pub capacity: Option<i64>,
}

impl GenerateSlotsArgs {
    pub fn into_params(self, defaults: &GenerationConfig) -> GenerateSlots {
        GenerateSlots {
            schedule_id: self.schedule_id,
            start_date: self.from,
            end_date: self.to,
            duration_minutes: self
                .duration
                .unwrap_or(defaults.default_duration_minutes),
            break_minutes: self.break_minutes.unwrap_or(defaults.default_break_minutes),
            capacity: self.capacity.unwrap_or(defaults.default_capacity),
        }
    }
}

/// List generated slots
#[derive(Args)]
pub struct ListSlotsArgs {
    #[arg(long, help = "Only slots generated from this schedule")]
    pub schedule: Option<u64>,
    #[arg(long, help = "Only slots of this agent")]
    pub agent: Option<String>,
    #[arg(
        long,
        help = "Only slots usable for this service (unscoped slots included)"
    )]
    pub service: Option<String>,
    #[arg(long, help = "First date, inclusive (YYYY-MM-DD)")]
    pub from: Option<String>,
    #[arg(long, help = "Last date, inclusive (YYYY-MM-DD)")]
    pub to: Option<String>,
    #[arg(long, help = "Only slots with free seats")]
    pub open: bool,
}

impl From<ListSlotsArgs> for ListSlots {
    fn from(val: ListSlotsArgs) -> Self {
        ListSlots {
            schedule_id: val.schedule,
            agent_id: val.agent,
            org_service_id: val.service,
            from: val.from,
            to: val.to,
            only_open: val.open,
        }
    }
}

/// List the dates on which a schedule has working hours
#[derive(Args)]
pub struct AvailableDatesArgs {
    #[arg(help = "Schedule to inspect")]
    pub schedule_id: u64,
    #[arg(long, help = "First date, inclusive (YYYY-MM-DD)")]
    pub from: String,
    #[arg(long, help = "Last date, inclusive (YYYY-MM-DD)")]
    pub to: String,
}

impl From<AvailableDatesArgs> for AvailableDates {
    fn from(val: AvailableDatesArgs) -> Self {
        AvailableDates {
            schedule_id: val.schedule_id,
            start_date: val.from,
            end_date: val.to,
        }
    }
}

/// Change the capacity of one slot
///
/// The capacity may be lowered here, but never below the seats already
/// booked.
#[derive(Args)]
pub struct SetCapacityArgs {
    #[arg(help = "Slot to edit")]
    pub slot_id: u64,
    #[arg(help = "New capacity")]
    pub capacity: i64,
}

impl From<SetCapacityArgs> for SetSlotCapacity {
    fn from(val: SetCapacityArgs) -> Self {
        SetSlotCapacity {
            slot_id: val.slot_id,
            capacity: val.capacity,
        }
    }
}

#[derive(Subcommand)]
pub enum SlotCommands {
    /// Generate slots from a schedule over a date range
    #[command(alias = "g")]
    Generate(GenerateSlotsArgs),
    /// List generated slots
    #[command(alias = "l")]
    List(ListSlotsArgs),
    /// List the dates on which a schedule has working hours
    #[command(alias = "d")]
    Dates(AvailableDatesArgs),
    /// Change the capacity of one slot
    Capacity(SetCapacityArgs),
}

/// Runs CLI commands against a scheduler and renders their markdown output.
pub struct Cli {
    scheduler: Scheduler,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(scheduler: Scheduler, renderer: TerminalRenderer) -> Self {
        Self {
            scheduler,
            renderer,
        }
    }

    pub async fn handle_schedule_command(&self, command: ScheduleCommands) -> Result<()> {
        match command {
            ScheduleCommands::Upsert(args) => {
                let upsert = self
                    .scheduler
                    .upsert_schedule(&args.into())
                    .await
                    .context("Failed to save schedule")?;
                self.renderer.render(&UpsertResult(upsert).to_string())
            }
            ScheduleCommands::List(args) => {
                let schedules = self
                    .scheduler
                    .list_schedules(&args.into())
                    .await
                    .context("Failed to list schedules")?;
                self.renderer.render(&Schedules(schedules).to_string())
            }
            ScheduleCommands::Show(args) => {
                let id = args.id;
                let Some(schedule) = self
                    .scheduler
                    .get_schedule(&args.into())
                    .await
                    .context("Failed to load schedule")?
                else {
                    bail!("Schedule with ID {id} not found");
                };
                self.renderer.render(&schedule.to_string())
            }
            ScheduleCommands::Toggle(args) => {
                let id = args.id;
                let active = self
                    .scheduler
                    .toggle_schedule(&args.into())
                    .await
                    .context("Failed to toggle schedule")?;
                let state = if active { "active" } else { "inactive" };
                let status = OperationStatus::success(format!("Schedule {id} is now {state}"));
                self.renderer.render(&status.to_string())
            }
            ScheduleCommands::Delete(args) => {
                let schedule = self
                    .scheduler
                    .delete_schedule(&args.into())
                    .await
                    .context("Failed to delete schedule")?;
                self.renderer.render(&DeleteResult::new(schedule).to_string())
            }
        }
    }

    pub async fn handle_exception_command(&self, command: ExceptionCommands) -> Result<()> {
        match command {
            ExceptionCommands::Add(args) => {
                let date = args.date.clone();
                let schedule = self
                    .scheduler
                    .add_exception(&args.into())
                    .await
                    .context("Failed to add exception")?;
                let result =
                    UpdateResult::with_changes(schedule, vec![format!("Set exception for {date}")]);
                self.renderer.render(&result.to_string())
            }
            ExceptionCommands::Remove(args) => {
                let params: RemoveException = args.into();
                let removed = self
                    .scheduler
                    .remove_exception(&params)
                    .await
                    .context("Failed to remove exception")?;
                let status = if removed {
                    OperationStatus::success(format!(
                        "Removed exception for {} from schedule {}",
                        params.date, params.schedule_id
                    ))
                } else {
                    OperationStatus::success(format!(
                        "Schedule {} has no exception for {}",
                        params.schedule_id, params.date
                    ))
                };
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn handle_slot_command(&self, command: SlotCommands) -> Result<()> {
        match command {
            SlotCommands::Generate(args) => {
                let params = args.into_params(&self.scheduler.config().generation);
                let report = self
                    .scheduler
                    .generate_slots(&params)
                    .await
                    .context("Failed to generate slots")?;
                self.renderer.render(&report.to_string())
            }
            SlotCommands::List(args) => {
                let slots = self
                    .scheduler
                    .list_slots(&args.into())
                    .await
                    .context("Failed to list slots")?;
                self.renderer.render(&Slots(slots).to_string())
            }
            SlotCommands::Dates(args) => {
                let dates = self
                    .scheduler
                    .available_dates(&args.into())
                    .await
                    .context("Failed to compute available dates")?;
                self.renderer.render(&Dates(dates).to_string())
            }
            SlotCommands::Capacity(args) => {
                let capacity = args.capacity;
                let slot = self
                    .scheduler
                    .set_slot_capacity(&args.into())
                    .await
                    .context("Failed to change slot capacity")?;
                let result =
                    UpdateResult::with_changes(slot, vec![format!("Capacity set to {capacity}")]);
                self.renderer.render(&result.to_string())
            }
        }
    }
}
