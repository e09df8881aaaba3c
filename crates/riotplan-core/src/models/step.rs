//! Step model definition and its status state machine.

use serde::{Deserialize, Serialize};

use super::StepStatus;
use crate::error::{PlanError, Result};

/// Represents an individual step within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Position of the step in the plan (1-based, reassigned on insert/remove)
    pub number: u32,

    /// Brief title/summary of the step
    pub title: String,

    /// Detailed description, read from the step file body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Completion or skip notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Why the step is blocked; only set while `status` is blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// An operation that moves a step between statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// pending | blocked → in_progress
    Start,
    /// in_progress | pending → completed
    Complete { notes: Option<String> },
    /// any non-terminal → blocked
    Block { reason: String },
    /// blocked → pending
    Unblock,
    /// pending | blocked → skipped
    Skip { reason: Option<String> },
}

impl StepAction {
    /// Operation name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            StepAction::Start => "start",
            StepAction::Complete { .. } => "complete",
            StepAction::Block { .. } => "block",
            StepAction::Unblock => "unblock",
            StepAction::Skip { .. } => "skip",
        }
    }

    /// Whether the action may be applied to a step in `status`.
    pub fn allowed_from(&self, status: StepStatus) -> bool {
        use StepStatus::*;
        match self {
            StepAction::Start => matches!(status, Pending | Blocked),
            StepAction::Complete { .. } => matches!(status, InProgress | Pending),
            StepAction::Block { .. } => !status.is_terminal(),
            StepAction::Unblock => status == Blocked,
            StepAction::Skip { .. } => matches!(status, Pending | Blocked),
        }
    }
}

impl Step {
    /// Creates a fresh pending step.
    pub fn new(number: u32, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            number,
            title: title.into(),
            description,
            status: StepStatus::Pending,
            notes: None,
            block_reason: None,
        }
    }

    /// Applies `action` and returns the resulting step, leaving `self`
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidTransition`] when the action is not allowed
    /// from the current status, and [`PlanError::InvalidInput`] when a block
    /// reason is empty.
    pub fn apply(&self, action: &StepAction) -> Result<Step> {
        if !action.allowed_from(self.status) {
            return Err(PlanError::InvalidTransition {
                operation: action.name(),
                step: self.number,
                status: self.status,
            });
        }

        let mut next = self.clone();
        match action {
            StepAction::Start => {
                next.status = StepStatus::InProgress;
                next.block_reason = None;
            }
            StepAction::Complete { notes } => {
                next.status = StepStatus::Completed;
                if let Some(notes) = notes {
                    next.notes = Some(notes.clone());
                }
            }
            StepAction::Block { reason } => {
                if reason.trim().is_empty() {
                    return Err(PlanError::invalid_input("reason")
                        .with_reason("a block reason is required"));
                }
                next.status = StepStatus::Blocked;
                next.block_reason = Some(reason.trim().to_string());
            }
            StepAction::Unblock => {
                next.status = StepStatus::Pending;
                next.block_reason = None;
            }
            StepAction::Skip { reason } => {
                next.status = StepStatus::Skipped;
                next.block_reason = None;
                if let Some(reason) = reason {
                    next.notes = Some(reason.clone());
                }
            }
        }
        Ok(next)
    }
}
