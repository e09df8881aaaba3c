//! Data models for plans, steps, feedback and validation.
//!
//! Models are plain values. Status changes never mutate in place: every
//! transition returns a new [`Plan`], so the state machine can be exercised
//! without touching the filesystem and persisted separately through
//! [`crate::store`].
//!
//! # Examples
//!
//! ```rust
//! use riotplan_core::models::{Step, StepAction, StepStatus};
//!
//! let step = Step::new(1, "Setup", None);
//! let started = step.apply(&StepAction::Start).unwrap();
//! assert_eq!(started.status, StepStatus::InProgress);
//!
//! // Completed steps are terminal
//! let done = started.apply(&StepAction::Complete { notes: None }).unwrap();
//! assert!(done.apply(&StepAction::Complete { notes: None }).is_err());
//! ```

pub mod feedback;
pub mod plan;
pub mod status;
pub mod step;
pub mod validation;

#[cfg(test)]
mod tests;

pub use feedback::{FeedbackRecord, Participant, ParticipantType};
pub use plan::{progress_percent, Blocker, Plan, PlanMetadata, PlanState, StepChange};
pub use status::{PlanStatus, StepStatus};
pub use step::{Step, StepAction};
pub use validation::{Finding, FindingCategory, Severity, ValidationResult};
