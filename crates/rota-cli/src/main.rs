//! Rota CLI
//!
//! Command-line interface and MCP server for the rota slot engine.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, RotaMcpServer};
use renderer::TerminalRenderer;
use rota_core::{Config, SchedulerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        config,
        no_color,
        command,
    } = Args::parse();

    let config = Config::load(config.as_deref()).context("Failed to load configuration")?;

    let scheduler = SchedulerBuilder::new()
        .with_database_path(database_file)
        .with_config(config)
        .build()
        .await
        .context("Failed to initialize scheduler")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Rota started");

    match command {
        Schedule { command } => {
            Cli::new(scheduler, renderer)
                .handle_schedule_command(command)
                .await
        }
        Exception { command } => {
            Cli::new(scheduler, renderer)
                .handle_exception_command(command)
                .await
        }
        Slots { command } => {
            Cli::new(scheduler, renderer)
                .handle_slot_command(command)
                .await
        }
        Serve => {
            info!("Starting Rota MCP server");
            run_stdio_server(RotaMcpServer::new(scheduler))
                .await
                .context("MCP server failed")
        }
    }
}
