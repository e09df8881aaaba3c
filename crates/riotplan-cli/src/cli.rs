//! Command-line interface definitions and handlers
//!
//! Argument types carry the clap derives and convert into the interface-free
//! parameter types of `riotplan_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! [`Cli`] dispatches parsed commands to the [`Planner`] and hands the
//! results to the [`TerminalRenderer`].

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::debug;
use riotplan_core::{
    display::{CreateResult, DeleteResult, FeedbackRecords, PlanSummary, Steps, UpdateResult},
    params::*,
    render::step_label,
    Plan, Planner, StepChange, StepStatus,
};

use crate::renderer::TerminalRenderer;

/// Default titles and descriptions for `plan init`.
const DEFAULT_STEPS: [(&str, &str); 5] = [
    ("Setup", "Initial setup and prerequisites"),
    ("Implementation", "Core implementation work"),
    ("Testing", "Verify everything works"),
    ("Documentation", "Update documentation"),
    ("Release", "Final release preparation"),
];

/// Turns a plan code into a display name: `big-feature` → `Big Feature`.
fn format_name(code: &str) -> String {
    code.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Plan commands
// ============================================================================

/// Create a new plan directory
#[derive(Args)]
pub struct InitArgs {
    /// Plan code, used as the directory name (e.g. `big-feature`)
    pub name: String,
    #[arg(short, long, help = "Optional description of what the plan is for")]
    pub description: Option<String>,
    #[arg(
        short,
        long,
        default_value = ".",
        help = "Directory to create the plan directory in"
    )]
    pub path: PathBuf,
    #[arg(
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u8).range(0..=5),
        help = "Number of initial steps (0-5)"
    )]
    pub steps: u8,
}

impl From<InitArgs> for CreatePlan {
    fn from(val: InitArgs) -> Self {
        CreatePlan {
            name: format_name(&val.name),
            code: val.name,
            base_path: val.path,
            description: val.description,
            steps: DEFAULT_STEPS
                .iter()
                .take(usize::from(val.steps))
                .map(|(title, description)| StepSpec {
                    title: (*title).to_string(),
                    description: Some((*description).to_string()),
                })
                .collect(),
        }
    }
}

/// Check a plan for structural problems
#[derive(Args)]
pub struct ValidateArgs {
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(long, help = "Treat warnings as errors")]
    pub strict: bool,
    #[arg(long, help = "Repair fixable findings before reporting")]
    pub fix: bool,
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

/// Move a plan into the archive
#[derive(Args)]
pub struct ArchiveArgs {
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(
        short,
        long,
        help = "Archive directory (defaults to the configured one, then ./archive next to the plan)"
    )]
    pub target: Option<PathBuf>,
    #[arg(long, help = "Archive even if the plan is not completed")]
    pub force: bool,
    #[arg(long, help = "Mark the plan completed before archiving")]
    pub mark_complete: bool,
}

impl From<&ArchiveArgs> for ArchivePlan {
    fn from(val: &ArchiveArgs) -> Self {
        ArchivePlan {
            target: val.target.clone(),
            force: val.force,
            mark_complete: val.mark_complete,
        }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan
    #[command(alias = "new")]
    Init(InitArgs),
    /// Validate a plan's files
    #[command(alias = "check")]
    Validate(ValidateArgs),
    /// Archive a plan
    #[command(alias = "a")]
    Archive(ArchiveArgs),
}

// ============================================================================
// Status commands
// ============================================================================

/// Show plan status
#[derive(Args)]
pub struct StatusArgs {
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(short, long, help = "Include every step")]
    pub verbose: bool,
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Show plan status
    Show(StatusArgs),
}

// ============================================================================
// Step commands
// ============================================================================

/// List the steps of a plan
#[derive(Args)]
pub struct ListStepsArgs {
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(long, help = "Only show pending steps")]
    pub pending: bool,
    #[arg(long, help = "Only show completed steps")]
    pub completed: bool,
}

impl ListStepsArgs {
    fn matches(&self, status: StepStatus) -> bool {
        if !self.pending && !self.completed {
            return true;
        }
        (self.pending && status == StepStatus::Pending)
            || (self.completed && status == StepStatus::Completed)
    }
}

/// Add a step to a plan
#[derive(Args)]
pub struct AddStepArgs {
    /// Title of the step
    pub title: String,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(short, long, help = "Number the new step should get")]
    pub position: Option<u32>,
    #[arg(short, long, help = "Insert after this step number")]
    pub after: Option<u32>,
    #[arg(short, long, help = "Optional description of what needs to be done")]
    pub description: Option<String>,
}

impl From<AddStepArgs> for InsertStep {
    fn from(val: AddStepArgs) -> Self {
        InsertStep {
            title: val.title,
            description: val.description,
            position: val.position,
            after: val.after,
        }
    }
}

/// Remove a step from a plan
#[derive(Args)]
pub struct RemoveStepArgs {
    /// Number of the step to remove
    pub number: u32,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(short, long, help = "Remove without the confirmation warning")]
    pub force: bool,
}

/// Identify a single step
#[derive(Args)]
pub struct StepArgs {
    /// Step number
    pub number: u32,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
}

/// Complete a step
#[derive(Args)]
pub struct CompleteStepArgs {
    /// Step number
    pub number: u32,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(short, long, help = "Completion notes")]
    pub notes: Option<String>,
}

/// Block a step
#[derive(Args)]
pub struct BlockStepArgs {
    /// Step number
    pub number: u32,
    /// Why the step is blocked
    pub reason: String,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
}

/// Skip a step
#[derive(Args)]
pub struct SkipStepArgs {
    /// Step number
    pub number: u32,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(short, long, help = "Why the step is skipped")]
    pub reason: Option<String>,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// List steps
    #[command(aliases = ["l", "ls"])]
    List(ListStepsArgs),
    /// Add a step
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Remove a step and renumber the rest
    #[command(aliases = ["rm", "d"])]
    Remove(RemoveStepArgs),
    /// Start a step
    Start(StepArgs),
    /// Complete a step
    #[command(alias = "done")]
    Complete(CompleteStepArgs),
    /// Block a step
    Block(BlockStepArgs),
    /// Unblock a step
    Unblock(StepArgs),
    /// Skip a step
    Skip(SkipStepArgs),
}

// ============================================================================
// Feedback commands
// ============================================================================

/// Record feedback on a plan
#[derive(Args)]
pub struct CreateFeedbackArgs {
    /// Title of the feedback
    pub title: String,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(short, long, help = "Step the feedback refers to")]
    pub step: Option<u32>,
    #[arg(short, long, help = "Where the feedback came from (e.g. github, slack)")]
    pub platform: Option<String>,
    #[arg(long, help = "Summary of the feedback")]
    pub summary: Option<String>,
}

impl From<CreateFeedbackArgs> for CreateFeedback {
    fn from(val: CreateFeedbackArgs) -> Self {
        CreateFeedback {
            title: val.title,
            step: val.step,
            platform: val.platform,
            summary: val.summary,
            participants: Vec::new(),
        }
    }
}

/// List a plan's feedback
#[derive(Args)]
pub struct ListFeedbackArgs {
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

/// Show one feedback record
#[derive(Args)]
pub struct ShowFeedbackArgs {
    /// Feedback id (e.g. `001-review-notes`)
    pub id: String,
    #[arg(default_value = ".", help = "Path to the plan directory")]
    pub path: PathBuf,
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum FeedbackCommands {
    /// Record feedback
    #[command(alias = "c")]
    Create(CreateFeedbackArgs),
    /// List feedback
    #[command(aliases = ["l", "ls"])]
    List(ListFeedbackArgs),
    /// Show a feedback record
    #[command(alias = "s")]
    Show(ShowFeedbackArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// Dispatches commands to the planner and renders their results.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub fn handle_plan_command(&self, command: PlanCommands) -> Result<ExitCode> {
        match command {
            PlanCommands::Init(args) => {
                let created = self
                    .planner
                    .create_plan(&args.into())
                    .context("Failed to create plan")?;
                self.renderer.render(&CreateResult::new(created))?;
            }
            PlanCommands::Validate(args) => return self.validate_plan(&args),
            PlanCommands::Archive(args) => {
                let archived = self
                    .planner
                    .archive_plan(&args.path, &ArchivePlan::from(&args))
                    .context("Failed to archive plan")?;
                self.renderer.render(&archived)?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    fn validate_plan(&self, args: &ValidateArgs) -> Result<ExitCode> {
        let options = ValidateOptions {
            strict: args.strict,
        };

        let valid = if args.fix {
            let mut report = self
                .planner
                .fix_plan(&args.path)
                .context("Failed to fix plan")?;
            if args.strict {
                report.result = self
                    .planner
                    .validate_plan(&args.path, &options)
                    .context("Failed to validate plan")?;
            }
            if args.json {
                self.renderer.json(&report)?;
            } else {
                self.renderer.render(&report)?;
            }
            report.result.valid
        } else {
            let result = self
                .planner
                .validate_plan(&args.path, &options)
                .context("Failed to validate plan")?;
            if args.json {
                self.renderer.json(&result)?;
            } else {
                self.renderer.render(&result)?;
            }
            result.valid
        };

        Ok(if valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    pub fn handle_status_command(
        &self,
        command: Option<StatusCommands>,
        args: StatusArgs,
    ) -> Result<ExitCode> {
        let args = match command {
            Some(StatusCommands::Show(args)) => args,
            None => args,
        };
        let plan = self.load(&args.path)?;

        if args.json {
            self.renderer.json(&plan)?;
        } else if args.verbose {
            self.renderer.render(&plan)?;
        } else {
            self.renderer.render(&PlanSummary(&plan))?;
        }
        Ok(ExitCode::SUCCESS)
    }

    pub fn handle_step_command(&self, command: StepCommands) -> Result<ExitCode> {
        match command {
            StepCommands::List(args) => {
                let plan = self.load(&args.path)?;
                let steps = plan
                    .steps
                    .into_iter()
                    .filter(|step| args.matches(step.status))
                    .collect();
                self.renderer.render(&Steps(steps))?;
            }
            StepCommands::Add(args) => {
                let plan = self.load(&args.path)?;
                let inserted = self
                    .planner
                    .insert_step(&plan, &args.into())
                    .context("Failed to add step")?;
                self.renderer.render(&CreateResult::new(inserted))?;
            }
            StepCommands::Remove(args) => {
                let plan = self.load(&args.path)?;
                if !args.force {
                    let step = plan.require_step(args.number)?;
                    self.renderer.render(&format!(
                        "Will remove step {}: {}\n\nUse `--force` to remove it.\n",
                        step_label(step.number),
                        step.title
                    ))?;
                    return Ok(ExitCode::SUCCESS);
                }
                let removed = self
                    .planner
                    .remove_step(&plan, args.number)
                    .with_context(|| format!("Failed to remove step {}", args.number))?;
                self.renderer.render(&DeleteResult::new(removed))?;
            }
            StepCommands::Start(args) => {
                self.transition(&args.path, args.number, Vec::new(), |planner, plan| {
                    planner.start_step(plan, args.number)
                })?;
            }
            StepCommands::Complete(args) => {
                let changes = args
                    .notes
                    .iter()
                    .map(|notes| format!("Notes: {notes}"))
                    .collect();
                self.transition(&args.path, args.number, changes, |planner, plan| {
                    planner.complete_step(plan, args.number, args.notes.clone())
                })?;
            }
            StepCommands::Block(args) => {
                let changes = vec![format!("Reason: {}", args.reason)];
                self.transition(&args.path, args.number, changes, |planner, plan| {
                    planner.block_step(plan, args.number, &args.reason)
                })?;
            }
            StepCommands::Unblock(args) => {
                self.transition(&args.path, args.number, Vec::new(), |planner, plan| {
                    planner.unblock_step(plan, args.number)
                })?;
            }
            StepCommands::Skip(args) => {
                let changes = args
                    .reason
                    .iter()
                    .map(|reason| format!("Reason: {reason}"))
                    .collect();
                self.transition(&args.path, args.number, changes, |planner, plan| {
                    planner.skip_step(plan, args.number, args.reason.clone())
                })?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    pub fn handle_feedback_command(&self, command: FeedbackCommands) -> Result<ExitCode> {
        match command {
            FeedbackCommands::Create(args) => {
                let path = args.path.clone();
                let created = self
                    .planner
                    .create_feedback(&path, &args.into())
                    .context("Failed to record feedback")?;
                self.renderer.render(&CreateResult::new(created))?;
            }
            FeedbackCommands::List(args) => {
                let records = self
                    .planner
                    .list_feedback(&args.path)
                    .context("Failed to list feedback")?;
                if args.json {
                    self.renderer.json(&records)?;
                } else {
                    self.renderer.render(&FeedbackRecords(records))?;
                }
            }
            FeedbackCommands::Show(args) => {
                let record = self.planner.show_feedback(&args.path, &args.id)?;
                if args.json {
                    self.renderer.json(&record)?;
                } else {
                    self.renderer.render(&record)?;
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    fn load(&self, path: &Path) -> Result<Plan> {
        self.planner
            .load_plan(path)
            .with_context(|| format!("Failed to load plan from '{}'", path.display()))
    }

    /// Loads the plan, applies one step transition, saves, and reports the
    /// status change.
    fn transition<F>(
        &self,
        path: &Path,
        number: u32,
        mut changes: Vec<String>,
        apply: F,
    ) -> Result<()>
    where
        F: FnOnce(&Planner, &Plan) -> riotplan_core::Result<StepChange>,
    {
        let plan = self.load(path)?;
        let before = plan.step(number).map(|step| step.status);

        let change = apply(&self.planner, &plan)?;
        let saved = self
            .planner
            .save_plan(&change.plan)
            .context("Failed to save plan")?;
        debug!("Saved {}", saved.display());

        if let Some(before) = before {
            changes.insert(0, format!("Status: {before} → {}", change.step.status));
        }
        self.renderer
            .render(&UpdateResult::with_changes(change, changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("big-feature"), "Big Feature");
        assert_eq!(format_name("v2"), "V2");
        assert_eq!(format_name("a--b"), "A B");
    }

    #[test]
    fn test_init_args_take_default_steps() {
        let params: CreatePlan = InitArgs {
            name: "release-prep".to_string(),
            description: None,
            path: PathBuf::from("plans"),
            steps: 4,
        }
        .into();

        assert_eq!(params.code, "release-prep");
        assert_eq!(params.name, "Release Prep");
        assert_eq!(params.base_path, PathBuf::from("plans"));
        let titles: Vec<&str> = params.steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Setup", "Implementation", "Testing", "Documentation"]
        );
    }

    #[test]
    fn test_step_filters() {
        let all = ListStepsArgs {
            path: PathBuf::from("."),
            pending: false,
            completed: false,
        };
        assert!(all.matches(StepStatus::Blocked));

        let pending = ListStepsArgs {
            pending: true,
            ..all
        };
        assert!(pending.matches(StepStatus::Pending));
        assert!(!pending.matches(StepStatus::Completed));
    }
}
