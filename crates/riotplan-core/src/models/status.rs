//! Status enumerations for plans and steps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowercases and folds spaces/hyphens to underscores so that labels such as
/// `"In Progress"` parse the same as `"in_progress"`.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// No step has been touched yet
    #[default]
    NotStarted,

    /// Work has begun on at least one step
    InProgress,

    /// Every step is finished (or the plan was explicitly marked complete)
    Completed,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "not_started" | "notstarted" => Ok(PlanStatus::NotStarted),
            "in_progress" | "inprogress" => Ok(PlanStatus::InProgress),
            "completed" => Ok(PlanStatus::Completed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Canonical serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::NotStarted => "not_started",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
        }
    }

    /// Human-readable label used in the status document.
    pub fn label(&self) -> &'static str {
        match self {
            PlanStatus::NotStarted => "Not Started",
            PlanStatus::InProgress => "In Progress",
            PlanStatus::Completed => "Completed",
        }
    }

    /// Emoji icon paired with the label.
    pub fn icon(&self) -> &'static str {
        match self {
            PlanStatus::NotStarted => "⬜",
            PlanStatus::InProgress => "🔄",
            PlanStatus::Completed => "✅",
        }
    }

    /// Icon and label, e.g. `🔄 In Progress`.
    pub fn with_icon(&self) -> String {
        format!("{} {}", self.icon(), self.label())
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step has not been started
    #[default]
    Pending,

    /// Step is being worked on
    InProgress,

    /// Step has been completed
    Completed,

    /// Step cannot proceed until its block reason is resolved
    Blocked,

    /// Step was deliberately not done
    Skipped,

    /// Step execution failed (reported by external executors)
    Failed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(StepStatus::Pending),
            "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "blocked" => Ok(StepStatus::Blocked),
            "skipped" => Ok(StepStatus::Skipped),
            "failed" => Ok(StepStatus::Failed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Canonical serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Blocked => "blocked",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed => "failed",
        }
    }

    /// Emoji icon for the status.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use riotplan_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.icon(), "✅");
    /// assert_eq!(StepStatus::Pending.icon(), "⬜");
    /// ```
    pub fn icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "⬜",
            StepStatus::InProgress => "🔄",
            StepStatus::Completed => "✅",
            StepStatus::Blocked => "⏸️",
            StepStatus::Skipped => "⏭️",
            StepStatus::Failed => "❌",
        }
    }

    /// Icon followed by the canonical name, e.g. `✅ completed`.
    pub fn with_icon(&self) -> String {
        format!("{} {}", self.icon(), self.as_str())
    }

    /// Completed and skipped steps admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
