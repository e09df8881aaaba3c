//! Plan lifecycle operations for the Planner.

use std::path::{Path, PathBuf};

use super::Planner;
use crate::{
    error::Result,
    models::{Plan, ValidationResult},
    params::{ArchivePlan, CreatePlan, ValidateOptions},
    render,
    store::{self, ArchivedPlan, CreatedPlan},
    validate::{self, FixReport},
};

/// Directory next to a plan that archives go to by default.
const DEFAULT_ARCHIVE_DIR: &str = "archive";

impl Planner {
    /// Loads the plan stored in `path`.
    ///
    /// # Errors
    ///
    /// `PlanNotFound` when there is no plan at `path`, `PlanCorrupt` when its
    /// status document cannot be parsed or its numbering has gaps.
    pub fn load_plan(&self, path: &Path) -> Result<Plan> {
        store::load(path)
    }

    /// Creates a plan directory with its status document and step files.
    pub fn create_plan(&self, params: &CreatePlan) -> Result<CreatedPlan> {
        store::create(params)
    }

    /// Runs every structural check against the plan in `path`.
    pub fn validate_plan(&self, path: &Path, options: &ValidateOptions) -> Result<ValidationResult> {
        validate::validate_plan(path, options)
    }

    /// Repairs what validation reports as fixable.
    pub fn fix_plan(&self, path: &Path) -> Result<FixReport> {
        validate::fix_plan(path)
    }

    /// Renders the status document for `plan`, keeping hand-written content
    /// of `existing`.
    pub fn generate_status(&self, plan: &Plan, existing: Option<&str>) -> String {
        render::generate_status(plan, existing)
    }

    /// Persists the plan's state to its status document.
    pub fn save_plan(&self, plan: &Plan) -> Result<PathBuf> {
        store::save(plan)
    }

    /// Directory a plan is archived into when the caller names none.
    pub fn archive_target(&self, path: &Path, params: &ArchivePlan) -> PathBuf {
        if let Some(target) = params.target.as_ref().or(self.config.archive_dir.as_ref()) {
            return target.clone();
        }
        match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.join(DEFAULT_ARCHIVE_DIR),
            // `.` or a bare name: archive next to the resolved directory
            None => path
                .canonicalize()
                .ok()
                .and_then(|p| p.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_ARCHIVE_DIR),
        }
    }

    /// Moves the plan in `path` into the archive.
    ///
    /// # Errors
    ///
    /// `PlanNotCompleted` for an unfinished plan unless `force` or
    /// `mark_complete` is set, `ArchiveTargetConflict` when the archive
    /// already holds a directory of the same name.
    pub fn archive_plan(&self, path: &Path, params: &ArchivePlan) -> Result<ArchivedPlan> {
        let target = self.archive_target(path, params);
        store::archive(path, &target, params)
    }
}
