use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ExceptionCommands, ScheduleCommands, SlotCommands};

/// Agent availability and slot generation
///
/// Rota keeps a weekly working pattern per agent, date-specific exceptions
/// (holidays, replacement hours), and expands them into bookable,
/// capacity-bounded time slots. Every operation is available from the command
/// line and, through `rota serve`, as MCP tools on stdio.
#[derive(Parser)]
#[command(version, about, name = "rota")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/rota/rota.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to a TOML configuration file. Defaults to
    /// $XDG_CONFIG_HOME/rota/config.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage agent schedules
    #[command(alias = "sc")]
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Manage date-specific exceptions of a schedule
    #[command(alias = "ex")]
    Exception {
        #[command(subcommand)]
        command: ExceptionCommands,
    },
    /// Generate and inspect slots
    #[command(alias = "sl")]
    Slots {
        #[command(subcommand)]
        command: SlotCommands,
    },
    /// Start the MCP server on stdio
    Serve,
}
