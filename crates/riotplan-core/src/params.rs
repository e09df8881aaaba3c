//! Parameter structures for plan operations
//!
//! These structures are shared across interfaces (the CLI today, any future
//! front end) and carry no framework-specific derives. Interface layers keep
//! their own argument types and convert into these with `From` impls:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │    Planner      │
//! │  (clap derives) │───▶│ (serde only)    │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::{Participant, StepStatus};

/// Title and optional description of a step to create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepSpec {
    pub title: String,
    pub description: Option<String>,
}

impl StepSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

/// Parameters for creating a new plan.
///
/// The plan is materialized at `base_path/code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Identifier; must match `^[a-z0-9]+(-[a-z0-9]+)*$`
    pub code: String,
    /// Display name
    pub name: String,
    /// Directory the plan directory is created in
    pub base_path: PathBuf,
    /// Optional detailed description of the plan
    pub description: Option<String>,
    /// Initial steps, numbered 1..N in the given order
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// Parameters for inserting a step into a loaded plan.
///
/// `position` takes precedence over `after`; with neither the step is
/// appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertStep {
    pub title: String,
    pub description: Option<String>,
    /// 1-based target number for the new step
    pub position: Option<u32>,
    /// Insert immediately after this step number
    pub after: Option<u32>,
}

/// A step transition to fold into plan state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub step: Option<u32>,
    pub step_status: Option<StepStatus>,
}

/// Parameters for archiving a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchivePlan {
    /// Archive directory; falls back to the configured one, then to an
    /// `archive` directory next to the plan
    pub target: Option<PathBuf>,
    /// Archive even if the plan is not completed
    #[serde(default)]
    pub force: bool,
    /// Mark the plan completed before archiving
    #[serde(default)]
    pub mark_complete: bool,
}

/// Parameters for recording feedback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFeedback {
    pub title: String,
    pub step: Option<u32>,
    pub platform: Option<String>,
    pub summary: Option<String>,
    /// Falls back to the configured participant when empty
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Parameters for validating a plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ValidateOptions {
    /// Treat warnings as errors for the verdict
    #[serde(default)]
    pub strict: bool,
}
