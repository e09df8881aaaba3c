use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{FeedbackCommands, PlanCommands, StatusArgs, StatusCommands, StepCommands};

/// Command-line interface for RiotPlan
///
/// RiotPlan keeps long-lived plans as plain markdown in a directory: a
/// STATUS.md document with the plan's state, one file per step, and a
/// feedback log. Most commands take the plan directory as a trailing path
/// argument and default to the current directory.
#[derive(Parser)]
#[command(version, about, name = "riotplan")]
pub struct Args {
    /// Path to a JSON config file. Defaults to
    /// $XDG_CONFIG_HOME/riotplan/config.json
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
    /// Create, validate and archive plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show plan status
    #[command(args_conflicts_with_subcommands = true)]
    Status {
        #[command(subcommand)]
        command: Option<StatusCommands>,
        #[command(flatten)]
        args: StatusArgs,
    },
    /// Manage and transition steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Record and read plan feedback
    #[command(alias = "f")]
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },
}
