//! Error types for the plan engine.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::StepStatus;

/// Comprehensive error type for all plan operations.
///
/// Every variant carries a stable [`code`](PlanError::code) so presentation
/// layers can render it and pick an exit status without matching on messages.
#[derive(Error, Debug)]
pub enum PlanError {
    /// No plan structure at the given location
    #[error("No plan found at '{}'", path.display())]
    PlanNotFound { path: PathBuf },
    /// A plan structure already exists where one was about to be created
    #[error("A plan already exists at '{}'", path.display())]
    PlanAlreadyExists { path: PathBuf },
    /// Plan files are present but cannot be turned into a valid plan
    #[error("Plan at '{}' is corrupt: {reason}", path.display())]
    PlanCorrupt { path: PathBuf, reason: String },
    /// Plan code does not match `^[a-z0-9]+(-[a-z0-9]+)*$`
    #[error("Invalid plan code '{code}': use lowercase letters, digits and single hyphens")]
    InvalidCode { code: String },
    /// Step number does not exist in the plan
    #[error("Step {number} not found")]
    StepNotFound { number: u32 },
    /// Insertion point is out of range
    #[error("Invalid position: {reason}")]
    InvalidPosition { reason: String },
    /// Status transition is not allowed from the step's current state
    #[error("Cannot {operation} step {step}: step is {status}")]
    InvalidTransition {
        operation: &'static str,
        step: u32,
        status: StepStatus,
    },
    /// Archive attempted on an unfinished plan without force/mark-complete
    #[error("Plan '{code}' is not completed; use force or mark-complete to archive it")]
    PlanNotCompleted { code: String },
    /// Archive destination already holds a plan of the same name
    #[error("Archive target '{}' already exists", path.display())]
    ArchiveTargetConflict { path: PathBuf },
    /// Feedback record id is unknown
    #[error("Feedback '{id}' not found")]
    FeedbackNotFound { id: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlanError {
        PlanError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for corrupt-plan errors, bound to the offending plan directory.
pub struct CorruptPlanBuilder {
    path: PathBuf,
}

impl CorruptPlanBuilder {
    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlanError {
        PlanError::PlanCorrupt {
            path: self.path,
            reason: reason.into(),
        }
    }
}

impl PlanError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a builder for corrupt-plan errors.
    pub fn corrupt(path: impl Into<PathBuf>) -> CorruptPlanBuilder {
        CorruptPlanBuilder { path: path.into() }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlanError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::PlanNotFound { .. } => "PLAN_NOT_FOUND",
            PlanError::PlanAlreadyExists { .. } => "PLAN_ALREADY_EXISTS",
            PlanError::PlanCorrupt { .. } => "PLAN_CORRUPT",
            PlanError::InvalidCode { .. } => "INVALID_CODE",
            PlanError::StepNotFound { .. } => "STEP_NOT_FOUND",
            PlanError::InvalidPosition { .. } => "INVALID_POSITION",
            PlanError::InvalidTransition { .. } => "INVALID_TRANSITION",
            PlanError::PlanNotCompleted { .. } => "PLAN_NOT_COMPLETED",
            PlanError::ArchiveTargetConflict { .. } => "ARCHIVE_TARGET_CONFLICT",
            PlanError::FeedbackNotFound { .. } => "FEEDBACK_NOT_FOUND",
            PlanError::InvalidInput { .. } => "INVALID_INPUT",
            PlanError::FileSystem { .. } => "FILE_SYSTEM",
            PlanError::Serialization { .. } => "SERIALIZATION",
            PlanError::Configuration { .. } => "CONFIGURATION",
        }
    }
}

/// Extension trait for attaching a path to I/O results.
pub trait IoResultExt<T> {
    /// Map an I/O error into [`PlanError::FileSystem`] for `path`.
    fn fs_context(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| PlanError::fs(path, e))
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to a configuration error.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| PlanError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

/// Result type alias for plan operations
pub type Result<T> = std::result::Result<T, PlanError>;
