//! Plan model definition and state recomputation.

use std::path::PathBuf;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanStatus, Step, StepAction, StepStatus};
use crate::error::{PlanError, Result};
use crate::params::StatusUpdate;

/// Description used for a blocker whose step carries no reason.
const DEFAULT_BLOCKER: &str = "Step blocked";

/// Identity of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanMetadata {
    /// Lowercase, hyphen-separated identifier; immutable once created
    pub code: String,

    /// Display name
    pub name: String,

    /// Optional multi-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Something preventing the plan from moving forward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Blocker {
    /// What is blocking
    pub description: String,

    /// Step the blocker was raised for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,

    /// When the blocker was first recorded
    pub created_at: Timestamp,
}

/// Aggregate execution state of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanState {
    /// Overall plan status
    #[serde(default)]
    pub status: PlanStatus,

    /// Completed steps as a rounded percentage; derived from the steps
    pub progress: u8,

    /// Step currently being worked on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,

    /// Open blockers, oldest first
    #[serde(default)]
    pub blockers: Vec<Blocker>,

    /// When the plan was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    /// Last time the state was recomputed
    pub last_updated_at: Timestamp,
}

impl PlanState {
    /// Initial state of a freshly created plan.
    pub fn new(now: Timestamp) -> Self {
        Self {
            status: PlanStatus::NotStarted,
            progress: 0,
            current_step: None,
            blockers: Vec::new(),
            completed_at: None,
            last_updated_at: now,
        }
    }
}

/// Represents a complete plan with metadata, state and steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// Directory holding the plan's files
    pub path: PathBuf,

    /// Identity of the plan
    pub metadata: PlanMetadata,

    /// Aggregate state
    pub state: PlanState,

    /// Steps ordered by number, numbered `1..=N`
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A plan after a step transition, together with the step as it now stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepChange {
    pub plan: Plan,
    pub step: Step,
}

/// Computes `round(100 * completed / total)`, rounding halves up, or `0` for
/// an empty plan.
///
/// # Examples
///
/// ```rust
/// use riotplan_core::models::progress_percent;
///
/// assert_eq!(progress_percent(1, 3), 33);
/// assert_eq!(progress_percent(1, 8), 13);
/// assert_eq!(progress_percent(0, 0), 0);
/// ```
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (200 * completed + total) / (2 * total);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

impl Plan {
    /// Looks up a step by number.
    pub fn step(&self, number: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.number == number)
    }

    /// Looks up a step by number, failing with [`PlanError::StepNotFound`].
    pub fn require_step(&self, number: u32) -> Result<&Step> {
        self.step(number)
            .ok_or(PlanError::StepNotFound { number })
    }

    /// Number of completed steps.
    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }

    /// Progress derived from the current steps.
    pub fn computed_progress(&self) -> u8 {
        progress_percent(self.completed_count(), self.steps.len())
    }

    /// Whether step numbers are exactly `1..=N` in order.
    pub fn is_densely_numbered(&self) -> bool {
        self.steps
            .iter()
            .enumerate()
            .all(|(i, s)| s.number as usize == i + 1)
    }

    /// Applies a status transition to one step and recomputes plan state.
    ///
    /// # Errors
    ///
    /// [`PlanError::StepNotFound`] for an unknown number,
    /// [`PlanError::InvalidTransition`] for a disallowed edge.
    pub fn apply_step_action(&self, number: u32, action: &StepAction) -> Result<StepChange> {
        self.apply_step_action_at(number, action, Timestamp::now())
    }

    /// [`apply_step_action`](Self::apply_step_action) with an explicit clock.
    pub fn apply_step_action_at(
        &self,
        number: u32,
        action: &StepAction,
        now: Timestamp,
    ) -> Result<StepChange> {
        let step = self.require_step(number)?.apply(action)?;

        let mut plan = self.clone();
        if let Some(slot) = plan.steps.iter_mut().find(|s| s.number == number) {
            *slot = step.clone();
        }

        let plan = plan.update_status_at(
            &StatusUpdate {
                step: Some(number),
                step_status: Some(step.status),
            },
            now,
        );
        Ok(StepChange { plan, step })
    }

    /// Recomputes the plan state after a step transition. Pure; the caller
    /// persists the result.
    pub fn update_status(&self, update: &StatusUpdate) -> Plan {
        self.update_status_at(update, Timestamp::now())
    }

    /// [`update_status`](Self::update_status) with an explicit clock.
    pub fn update_status_at(&self, update: &StatusUpdate, now: Timestamp) -> Plan {
        let mut plan = self.clone();

        if let (Some(number), Some(status)) = (update.step, update.step_status) {
            if let Some(step) = plan.steps.iter_mut().find(|s| s.number == number) {
                step.status = status;
                if status != StepStatus::Blocked {
                    step.block_reason = None;
                }
            }
        }

        plan.state.progress = plan.computed_progress();
        plan.state.current_step = plan.resolve_current_step(update);
        plan.state.blockers = plan.resolve_blockers(now);
        plan.state.status = plan.resolve_status();
        plan.state.completed_at = match plan.state.status {
            PlanStatus::Completed => plan.state.completed_at.or(Some(now)),
            _ => None,
        };
        plan.state.last_updated_at = now;
        plan
    }

    fn resolve_current_step(&self, update: &StatusUpdate) -> Option<u32> {
        let in_progress = |n: u32| {
            self.step(n)
                .is_some_and(|s| s.status == StepStatus::InProgress)
        };

        if let Some(n) = update.step.filter(|n| in_progress(*n)) {
            return Some(n);
        }
        if let Some(n) = self.state.current_step.filter(|n| in_progress(*n)) {
            return Some(n);
        }
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::InProgress)
            .map(|s| s.number)
    }

    fn resolve_blockers(&self, now: Timestamp) -> Vec<Blocker> {
        let mut blockers: Vec<Blocker> = self
            .state
            .blockers
            .iter()
            .filter(|b| match b.step {
                Some(n) => self.step(n).is_some_and(|s| s.status == StepStatus::Blocked),
                None => true,
            })
            .cloned()
            .collect();

        for step in self.steps.iter().filter(|s| s.status == StepStatus::Blocked) {
            let description = step
                .block_reason
                .clone()
                .unwrap_or_else(|| DEFAULT_BLOCKER.to_string());
            match blockers.iter_mut().find(|b| b.step == Some(step.number)) {
                Some(existing) => existing.description = description,
                None => blockers.push(Blocker {
                    description,
                    step: Some(step.number),
                    created_at: now,
                }),
            }
        }
        blockers
    }

    fn resolve_status(&self) -> PlanStatus {
        if !self.steps.is_empty() && self.steps.iter().all(|s| s.status.is_terminal()) {
            return PlanStatus::Completed;
        }
        if self.steps.iter().any(|s| s.status != StepStatus::Pending) {
            return PlanStatus::InProgress;
        }
        match self.state.status {
            PlanStatus::Completed if !self.steps.is_empty() => PlanStatus::InProgress,
            status => status,
        }
    }

    /// Marks the whole plan completed regardless of its steps.
    pub fn mark_completed_at(&self, now: Timestamp) -> Plan {
        let mut plan = self.clone();
        plan.state.status = PlanStatus::Completed;
        plan.state.completed_at = Some(now);
        plan.state.last_updated_at = now;
        plan
    }
}
