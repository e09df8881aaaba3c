//! Display formatting for terminal output.
//!
//! Domain models implement [`std::fmt::Display`] as markdown; collections and
//! operation outcomes get newtype wrappers so the same data can be rendered
//! differently depending on context (a list versus a single item, a creation
//! versus an update).
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │    Markdown     │
//! │  (Plan, Step)   │───▶│ Result Types    │───▶│ (termimad/plain)│
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! This is presentation only. The status document written to disk is
//! produced by [`crate::render`], not here.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Steps, FeedbackRecords)
//! - [`results`]: Operation result types (CreateResult, UpdateResult, DeleteResult)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use riotplan_core::{display::Steps, models::Step};
//!
//! let steps = Steps(vec![Step::new(1, "Setup", None)]);
//! let output = format!("{steps}");
//! assert!(output.contains("### 01. Setup (⬜ pending)"));
//!
//! assert_eq!(format!("{}", Steps(vec![])), "No steps found.\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

// Re-export commonly used types for convenience
pub use collections::{FeedbackRecords, Steps};
pub use datetime::LocalDateTime;
pub use models::PlanSummary;
pub use results::{CreateResult, DeleteResult, UpdateResult};
