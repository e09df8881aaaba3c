//! File-backed persistence for plans.
//!
//! The store is the only writer of a plan directory. It turns the on-disk
//! representation into a [`Plan`] and back, applies the file side of step
//! insertion/removal, and moves finished plans into an archive.
//!
//! Nothing here locks: callers serialize access to a given plan directory.

pub mod feedback;
pub mod layout;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::{debug, info, warn};
use serde::Serialize;

pub use feedback::{count_feedback, create_feedback, get_feedback, list_feedback, CreatedFeedback};
pub use layout::{is_valid_code, slugify, StepFile};

use self::layout::{
    atomic_write, has_plan, renumbered_file_name, rewrite_step_heading, scan_step_files,
    status_path, step_description, step_file_content, step_file_name, STATUS_FILE, STEPS_DIR,
};
use crate::{
    editor::{Insertion, Removal, Renumbering},
    error::{IoResultExt, PlanError, Result},
    models::{Plan, PlanMetadata, PlanState, PlanStatus, Step, StepStatus},
    params::{ArchivePlan, CreatePlan},
    render::{generate_status, parse_status, StatusDocument},
};

/// A plan that was just materialized on disk.
#[derive(Debug, Clone)]
pub struct CreatedPlan {
    pub plan: Plan,
    pub path: PathBuf,
    /// Every file written, in write order
    pub files_created: Vec<PathBuf>,
}

/// A step file that moved to follow its step's new number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of inserting a step and persisting it.
#[derive(Debug, Clone)]
pub struct InsertedStep {
    pub plan: Plan,
    pub step: Step,
    pub created_file: PathBuf,
    pub renamed_files: Vec<RenamedFile>,
}

/// Outcome of removing a step and persisting it.
#[derive(Debug, Clone)]
pub struct RemovedStep {
    pub plan: Plan,
    pub removed_step: Step,
    pub renamed_files: Vec<RenamedFile>,
}

/// Outcome of archiving a plan.
#[derive(Debug, Clone)]
pub struct ArchivedPlan {
    /// The plan as archived, with `path` pointing at its new location
    pub plan: Plan,
    pub from: PathBuf,
    pub to: PathBuf,
}

fn not_found(path: &Path) -> PlanError {
    PlanError::PlanNotFound {
        path: path.to_path_buf(),
    }
}

/// Reads and parses the status document of a plan directory.
pub fn read_status_document(plan_dir: &Path) -> Result<StatusDocument> {
    if !plan_dir.is_dir() || !has_plan(plan_dir) {
        return Err(not_found(plan_dir));
    }
    let path = status_path(plan_dir);
    let content = fs::read_to_string(&path).fs_context(&path)?;
    parse_status(&content)
        .map_err(|reason| PlanError::corrupt(plan_dir).with_reason(format!("{STATUS_FILE}: {reason}")))
}

/// Checks that status rows are numbered exactly `1..=N` in order.
fn check_numbering(doc: &StatusDocument) -> std::result::Result<(), String> {
    for (index, row) in doc.rows.iter().enumerate() {
        let expected = index as u32 + 1;
        if row.number != expected {
            return Err(format!(
                "step numbering must run 1..={} without gaps; found {} where {} was expected",
                doc.rows.len(),
                row.number,
                expected
            ));
        }
    }
    Ok(())
}

/// Builds a plan from a parsed status document and the step files beside it,
/// without checking numbering.
pub(crate) fn assemble(plan_dir: &Path, doc: StatusDocument) -> Result<Plan> {
    let mut files: HashMap<u32, PathBuf> = HashMap::new();
    for file in scan_step_files(plan_dir)? {
        if files.contains_key(&file.number) {
            warn!("Ignoring duplicate step file {}", file.path.display());
            continue;
        }
        files.insert(file.number, file.path);
    }

    let mut steps = Vec::with_capacity(doc.rows.len());
    for row in doc.rows {
        let description = match files.get(&row.number) {
            Some(path) => step_description(&fs::read_to_string(path).fs_context(path)?),
            None => {
                warn!("Step {} of {} has no step file", row.number, plan_dir.display());
                None
            }
        };
        let blocked = row.status == StepStatus::Blocked;
        steps.push(Step {
            number: row.number,
            title: row.title,
            description,
            status: row.status,
            notes: row.notes,
            block_reason: row.block_reason.filter(|_| blocked),
        });
    }

    let mut plan = Plan {
        path: plan_dir.to_path_buf(),
        metadata: PlanMetadata {
            code: doc.code,
            name: doc.name,
            description: doc.description,
        },
        state: PlanState {
            status: doc.status,
            progress: 0,
            current_step: doc.current_step,
            blockers: doc.blockers,
            completed_at: doc.completed_at,
            last_updated_at: doc.last_updated_at,
        },
        steps,
    };
    plan.state.progress = plan.computed_progress();
    Ok(plan)
}

/// Loads the plan in `plan_dir`.
///
/// Step statuses come from the status document; descriptions come from the
/// step files. Progress is always recomputed from the steps.
///
/// # Errors
///
/// [`PlanError::PlanNotFound`] without a status document,
/// [`PlanError::PlanCorrupt`] when it cannot be parsed or its numbering is
/// not dense. Corrupt numbering is reported, never silently repaired.
pub fn load(plan_dir: &Path) -> Result<Plan> {
    let doc = read_status_document(plan_dir)?;

    if !is_valid_code(&doc.code) {
        return Err(PlanError::corrupt(plan_dir).with_reason(format!("invalid plan code '{}'", doc.code)));
    }
    check_numbering(&doc).map_err(|reason| PlanError::corrupt(plan_dir).with_reason(reason))?;

    let plan = assemble(plan_dir, doc)?;
    debug!("Loaded plan '{}' with {} steps", plan.metadata.code, plan.steps.len());
    Ok(plan)
}

/// Materializes a new plan at `base_path/code`.
///
/// Step files are written first and the status document last, so an
/// interrupted create never leaves a directory that loads as a plan.
///
/// # Errors
///
/// [`PlanError::InvalidCode`], [`PlanError::InvalidInput`] for an empty name
/// or step title, [`PlanError::PlanAlreadyExists`].
pub fn create(params: &CreatePlan) -> Result<CreatedPlan> {
    if !is_valid_code(&params.code) {
        return Err(PlanError::InvalidCode {
            code: params.code.clone(),
        });
    }
    let name = params.name.trim().replace(['\r', '\n'], " ");
    if name.is_empty() {
        return Err(PlanError::invalid_input("name").with_reason("plan name cannot be empty"));
    }
    if params.steps.iter().any(|s| s.title.trim().is_empty()) {
        return Err(PlanError::invalid_input("steps").with_reason("step titles cannot be empty"));
    }

    let path = params.base_path.join(&params.code);
    if has_plan(&path) {
        return Err(PlanError::PlanAlreadyExists { path });
    }

    let now = Timestamp::now();
    let plan = Plan {
        path: path.clone(),
        metadata: PlanMetadata {
            code: params.code.clone(),
            name,
            description: params
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        },
        state: PlanState::new(now),
        steps: params
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| Step::new(i as u32 + 1, s.title.trim(), s.description.clone()))
            .collect(),
    };

    let steps_dir = path.join(STEPS_DIR);
    fs::create_dir_all(&steps_dir).fs_context(&steps_dir)?;

    let mut files_created = Vec::with_capacity(plan.steps.len() + 1);
    for step in &plan.steps {
        files_created.push(write_new_step_file(&path, step)?);
    }
    files_created.push(save(&plan)?);

    info!("Created plan '{}' at {}", plan.metadata.code, path.display());
    Ok(CreatedPlan {
        plan,
        path,
        files_created,
    })
}

/// Writes the status document for `plan`, keeping hand-written content of the
/// existing file. Returns the document's path.
pub fn save(plan: &Plan) -> Result<PathBuf> {
    let path = status_path(&plan.path);
    let existing = if path.is_file() {
        Some(fs::read_to_string(&path).fs_context(&path)?)
    } else {
        None
    };
    atomic_write(&path, &generate_status(plan, existing.as_deref()))?;
    Ok(path)
}

/// Creates the step file for a new step; refuses to overwrite.
pub(crate) fn write_new_step_file(plan_dir: &Path, step: &Step) -> Result<PathBuf> {
    let path = plan_dir
        .join(STEPS_DIR)
        .join(step_file_name(step.number, &step.title));
    if path.exists() {
        return Err(PlanError::corrupt(plan_dir).with_reason(format!(
            "step file {} already exists",
            path.display()
        )));
    }
    fs::write(
        &path,
        step_file_content(step.number, &step.title, step.description.as_deref()),
    )
    .fs_context(&path)?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Moves step files to follow a renumbering, in the order given.
///
/// Callers pass shifts-up highest first and shifts-down lowest first so a
/// target name is always free by the time it is used.
pub(crate) fn rename_step_files(
    plan: &Plan,
    renumbered: &[Renumbering],
) -> Result<Vec<RenamedFile>> {
    let mut by_number: HashMap<u32, StepFile> = HashMap::new();
    for file in scan_step_files(&plan.path)? {
        by_number.entry(file.number).or_insert(file);
    }

    let mut renamed = Vec::with_capacity(renumbered.len());
    for change in renumbered {
        let Some(file) = by_number.get(&change.from) else {
            warn!("No step file for step {}; nothing to rename", change.from);
            continue;
        };
        let Some(new_name) = renumbered_file_name(file.file_name(), change.to) else {
            continue;
        };
        let to = file.path.with_file_name(new_name);
        fs::rename(&file.path, &to).fs_context(&file.path)?;

        if let Some(step) = plan.step(change.to) {
            let content = fs::read_to_string(&to).fs_context(&to)?;
            fs::write(&to, rewrite_step_heading(&content, change.to, &step.title))
                .fs_context(&to)?;
        }
        debug!("Renamed {} -> {}", file.path.display(), to.display());
        renamed.push(RenamedFile {
            from: file.path.clone(),
            to,
        });
    }
    Ok(renamed)
}

/// Persists a computed insertion: shifts step files, writes the new step's
/// file, then the status document.
pub fn apply_insertion(insertion: Insertion) -> Result<InsertedStep> {
    let Insertion {
        plan,
        step,
        renumbered,
    } = insertion;

    let renamed_files = rename_step_files(&plan, &renumbered)?;
    let created_file = write_new_step_file(&plan.path, &step)?;
    save(&plan)?;

    Ok(InsertedStep {
        plan,
        step,
        created_file,
        renamed_files,
    })
}

/// Persists a computed removal: deletes the removed step's file, shifts the
/// following files down, then writes the status document.
pub fn apply_removal(removal: Removal) -> Result<RemovedStep> {
    let Removal {
        plan,
        removed,
        renumbered,
    } = removal;

    if let Some(file) = scan_step_files(&plan.path)?
        .into_iter()
        .find(|f| f.number == removed.number)
    {
        fs::remove_file(&file.path).fs_context(&file.path)?;
        debug!("Removed {}", file.path.display());
    }
    let renamed_files = rename_step_files(&plan, &renumbered)?;
    save(&plan)?;

    Ok(RemovedStep {
        plan,
        removed_step: removed,
        renamed_files,
    })
}

/// Copies a directory tree. Top-level `STATUS.md` is copied last so a
/// partial copy is never loadable as a plan.
fn copy_plan_dir(from: &Path, to: &Path) -> Result<()> {
    fn copy_tree(from: &Path, to: &Path, skip: Option<&str>) -> Result<()> {
        fs::create_dir_all(to).fs_context(to)?;
        for entry in fs::read_dir(from).fs_context(from)? {
            let entry = entry.fs_context(from)?;
            let name = entry.file_name();
            if skip.is_some_and(|s| name.to_str() == Some(s)) {
                continue;
            }
            let source = entry.path();
            let target = to.join(&name);
            if entry.file_type().fs_context(&source)?.is_dir() {
                copy_tree(&source, &target, None)?;
            } else {
                fs::copy(&source, &target).fs_context(&source)?;
            }
        }
        Ok(())
    }

    copy_tree(from, to, Some(STATUS_FILE))?;
    let status = from.join(STATUS_FILE);
    fs::copy(&status, to.join(STATUS_FILE)).fs_context(&status)?;
    Ok(())
}

/// Copies `from` to `to` through a hidden staging directory next to `to`,
/// which is renamed into place once the copy is complete. On failure the
/// staging directory is removed and `to` is never created.
fn copy_via_staging(from: &Path, to: &Path) -> Result<()> {
    let name = to
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("plan");
    let staging = to.with_file_name(format!(".{name}.archiving"));
    if staging.exists() {
        fs::remove_dir_all(&staging).fs_context(&staging)?;
    }

    let staged = copy_plan_dir(from, &staging).and_then(|()| fs::rename(&staging, to).fs_context(to));
    if let Err(e) = staged {
        if let Err(cleanup) = fs::remove_dir_all(&staging) {
            warn!("Failed to clean up {}: {cleanup}", staging.display());
        }
        return Err(e);
    }
    Ok(())
}

/// Moves a plan directory; falls back to copy + delete across filesystems.
fn move_plan_dir(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            debug!("Cross-device move of {}; copying instead", from.display());
        }
        Err(e) => return Err(PlanError::fs(from, e)),
    }

    copy_via_staging(from, to)?;
    fs::remove_dir_all(from).fs_context(from)
}

/// Canonical form of `path`, which need not exist yet.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let mut missing = Vec::new();
    let mut existing = path;
    loop {
        match fs::canonicalize(existing) {
            Ok(resolved) => {
                return Ok(missing
                    .iter()
                    .rev()
                    .fold(resolved, |acc: PathBuf, part| acc.join(part)))
            }
            Err(e) => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(PlanError::fs(path, e));
                };
                missing.push(name.to_owned());
                existing = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
        }
    }
}

/// Moves a plan under `target`, keeping its directory name.
///
/// # Errors
///
/// [`PlanError::PlanNotCompleted`] unless the plan is completed, `force` is
/// set, or `mark_complete` is set; [`PlanError::ArchiveTargetConflict`] when
/// the destination exists. Both are raised before anything on disk changes.
pub fn archive(plan_dir: &Path, target: &Path, params: &ArchivePlan) -> Result<ArchivedPlan> {
    let plan = load(plan_dir)?;
    let from = fs::canonicalize(plan_dir).fs_context(plan_dir)?;

    let completed = plan.state.status == PlanStatus::Completed;
    if !completed && !params.force && !params.mark_complete {
        return Err(PlanError::PlanNotCompleted {
            code: plan.metadata.code,
        });
    }

    let dir_name = from
        .file_name()
        .ok_or_else(|| PlanError::invalid_input("path").with_reason("plan directory has no name"))?
        .to_owned();
    let target = resolve_path(target)?;
    if target.starts_with(&from) {
        return Err(PlanError::invalid_input("target")
            .with_reason("archive target cannot be inside the plan directory"));
    }
    let to = target.join(dir_name);
    if to.exists() {
        return Err(PlanError::ArchiveTargetConflict { path: to });
    }
    fs::create_dir_all(&target).fs_context(&target)?;

    let plan = if !completed && params.mark_complete {
        let marked = Plan {
            path: from.clone(),
            ..plan.mark_completed_at(Timestamp::now())
        };
        save(&marked)?;
        marked
    } else {
        plan
    };

    move_plan_dir(&from, &to)?;
    info!("Archived plan '{}' to {}", plan.metadata.code, to.display());

    Ok(ArchivedPlan {
        plan: Plan {
            path: to.clone(),
            ..plan
        },
        from,
        to,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::params::StepSpec;

    fn create_plan(dir: &TempDir) -> PathBuf {
        create(&CreatePlan {
            code: "demo".to_string(),
            name: "Demo".to_string(),
            base_path: dir.path().join("plans"),
            description: None,
            steps: vec![StepSpec::new("Setup"), StepSpec::new("Build")],
        })
        .expect("Failed to create plan")
        .path
    }

    #[test]
    fn test_staged_copy_lands_complete() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let from = create_plan(&dir);
        let archive = dir.path().join("archive");
        fs::create_dir_all(&archive).unwrap();
        // Leftover from an interrupted archive
        fs::create_dir_all(archive.join(".demo.archiving/plan")).unwrap();
        fs::write(archive.join(".demo.archiving/stale.md"), "stale").unwrap();

        let to = archive.join("demo");
        copy_via_staging(&from, &to).unwrap();

        assert!(!archive.join(".demo.archiving").exists());
        assert!(!to.join("stale.md").exists());
        let copied = load(&to).expect("Copy should load as a plan");
        assert_eq!(copied.steps.len(), 2);
        assert!(to.join("plan/02-build.md").is_file());

        // The source is left alone
        assert_eq!(load(&from).unwrap().steps.len(), 2);
    }

    #[test]
    fn test_partial_copy_is_not_a_plan() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let from = create_plan(&dir);
        fs::remove_file(from.join(STATUS_FILE)).unwrap();

        // Step files are copied before the status document
        let partial = dir.path().join("partial");
        assert!(copy_plan_dir(&from, &partial).is_err());
        assert!(partial.join("plan/01-setup.md").is_file());
        assert!(matches!(load(&partial), Err(PlanError::PlanNotFound { .. })));
    }

    #[test]
    fn test_failed_staged_copy_cleans_up() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let from = create_plan(&dir);
        fs::remove_file(from.join(STATUS_FILE)).unwrap();

        let archive = dir.path().join("archive");
        fs::create_dir_all(&archive).unwrap();
        let to = archive.join("demo");

        let err = copy_via_staging(&from, &to).unwrap_err();
        assert!(matches!(err, PlanError::FileSystem { .. }), "{err:?}");
        assert!(!to.exists());
        assert!(!archive.join(".demo.archiving").exists());
        assert!(from.join("plan/01-setup.md").is_file());
    }
}
