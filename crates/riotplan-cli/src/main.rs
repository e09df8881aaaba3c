//! RiotPlan command-line application
//!
//! Manages plan directories from the terminal. Set `RUST_LOG=debug` to see
//! the files each command reads and writes.

mod args;
mod cli;
mod renderer;

use std::process::ExitCode;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use riotplan_core::{PlanError, PlannerBuilder};

fn run(args: Args) -> Result<ExitCode> {
    let Args {
        config,
        no_color,
        command,
    } = args;

    let planner = PlannerBuilder::new()
        .with_config_path(config)
        .build()
        .context("Failed to initialize planner")?;

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));

    info!("riotplan started");

    match command {
        Commands::Plan { command } => cli.handle_plan_command(command),
        Commands::Status { command, args } => cli.handle_status_command(command, args),
        Commands::Step { command } => cli.handle_step_command(command),
        Commands::Feedback { command } => cli.handle_feedback_command(command),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            let code = err
                .downcast_ref::<PlanError>()
                .map_or("ERROR", PlanError::code);
            eprintln!("Error [{code}]: {err:#}");
            ExitCode::FAILURE
        }
    }
}
