//! High-level planner API for managing plans, steps and feedback.
//!
//! [`Planner`] is the single entry point front ends talk to. It ties the
//! pure model operations to the file store and carries the user
//! [`Config`](crate::config::Config).
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │     Planner     │    │  Models/Editor  │    │      Store      │
//! │ (plan_ops,      │───▶│ (pure state     │───▶│ (STATUS.md,     │
//! │  step_ops, ...) │    │  transitions)   │    │  step files)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!     Collaborator API     Business Logic         Persistence
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`plan_ops`]: Plan lifecycle (load, create, validate, save, archive)
//! - [`step_ops`]: Step editing and status transitions
//! - [`feedback_ops`]: The per-plan feedback log
//!
//! Step transitions are pure: they return a new plan and leave persistence
//! to [`Planner::save_plan`]. Insertion and removal touch step files, so they
//! persist immediately.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use riotplan_core::{params::CreatePlan, params::StepSpec, PlannerBuilder};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build()?;
//!
//! let created = planner.create_plan(&CreatePlan {
//!     code: "big-feature".to_string(),
//!     name: "Big Feature".to_string(),
//!     base_path: Path::new("plans").to_path_buf(),
//!     description: None,
//!     steps: vec![StepSpec::new("Setup"), StepSpec::new("Build")],
//! })?;
//!
//! let change = planner.start_step(&created.plan, 1)?;
//! planner.save_plan(&change.plan)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod feedback_ops;
pub mod plan_ops;
pub mod step_ops;

#[cfg(test)]
mod tests;

pub use builder::PlannerBuilder;

use crate::config::Config;

/// Main planner interface for managing plans and steps.
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) config: Config,
}

impl Planner {
    /// Creates a planner with the given configuration.
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
