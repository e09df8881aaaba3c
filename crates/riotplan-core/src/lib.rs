//! Core library for the RiotPlan plan/step lifecycle engine.
//!
//! A plan is a directory of markdown files: a status document carrying the
//! plan's state, one file per step, and an append-only feedback log. This
//! crate loads and persists that directory, enforces the step state
//! machine, keeps numbering dense when steps are inserted or removed, and
//! validates and repairs plans edited by hand.
//!
//! # Layers
//!
//! - **Models** ([`models`]): plain values; every transition returns a new
//!   [`Plan`]
//! - **Editor** ([`editor`]): pure insertion/removal with renumbering
//! - **Store** ([`store`]): the plan directory on disk
//! - **Renderer** ([`render`]): the status document, generated and parsed
//! - **Validator** ([`validate`]): findings over the raw files, and repair
//! - **Planner** ([`planner`]): the facade front ends talk to
//!
//! # Quick Start
//!
//! ```rust
//! use riotplan_core::{
//!     params::{CreatePlan, StepSpec},
//!     Config, PlannerBuilder, StepStatus,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let planner = PlannerBuilder::new().with_config(Config::default()).build()?;
//!
//! let created = planner.create_plan(&CreatePlan {
//!     code: "my-project".to_string(),
//!     name: "My Project".to_string(),
//!     base_path: dir.path().to_path_buf(),
//!     description: Some("A test project".to_string()),
//!     steps: vec![StepSpec::new("Setup"), StepSpec::new("Build")],
//! })?;
//!
//! let change = planner.complete_step(&created.plan, 1, None)?;
//! assert_eq!(change.step.status, StepStatus::Completed);
//! assert_eq!(change.plan.state.progress, 50);
//!
//! planner.save_plan(&change.plan)?;
//! let reloaded = planner.load_plan(&created.path)?;
//! assert_eq!(reloaded.state.progress, 50);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod display;
pub mod editor;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod render;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use config::Config;
pub use editor::{Insertion, Removal, Renumbering};
pub use error::{PlanError, Result};
pub use models::{
    Blocker, FeedbackRecord, Finding, Participant, ParticipantType, Plan, PlanMetadata,
    PlanState, PlanStatus, Step, StepAction, StepChange, StepStatus, ValidationResult,
};
pub use params::{
    ArchivePlan, CreateFeedback, CreatePlan, InsertStep, StatusUpdate, StepSpec, ValidateOptions,
};
pub use planner::{Planner, PlannerBuilder};
pub use store::{ArchivedPlan, CreatedFeedback, CreatedPlan, InsertedStep, RemovedStep, RenamedFile};
pub use validate::FixReport;
