//! Structural checks over the raw on-disk representation of a plan, and the
//! repair path for the findings that can be fixed mechanically.
//!
//! Validation never goes through [`store::load`], which refuses exactly the
//! plans the validator needs to describe.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    error::{IoResultExt, PlanError, Result},
    models::{progress_percent, Finding, FindingCategory, Severity, StepStatus, ValidationResult},
    params::ValidateOptions,
    render::{parse_status, step_label, StatusDocument},
    store::{
        self,
        layout::{
            has_plan, renumbered_file_name, rewrite_step_heading, scan_step_files, status_path,
            StepFile,
        },
        count_feedback, is_valid_code,
    },
};

pub const MISSING_STATUS_DOCUMENT: &str = "MISSING_STATUS_DOCUMENT";
pub const STATUS_PARSE_ERROR: &str = "STATUS_PARSE_ERROR";
pub const INVALID_CODE: &str = "INVALID_CODE";
pub const DUPLICATE_STEP_NUMBER: &str = "DUPLICATE_STEP_NUMBER";
pub const STEP_NUMBERING_GAP: &str = "STEP_NUMBERING_GAP";
pub const STEP_ORDER: &str = "STEP_ORDER";
pub const DUPLICATE_STEP_FILE: &str = "DUPLICATE_STEP_FILE";
pub const MISSING_STEP_FILE: &str = "MISSING_STEP_FILE";
pub const ORPHAN_STEP_FILE: &str = "ORPHAN_STEP_FILE";
pub const PROGRESS_MISMATCH: &str = "PROGRESS_MISMATCH";
pub const CURRENT_STEP_MISSING: &str = "CURRENT_STEP_MISSING";
pub const STEP_COUNT: &str = "STEP_COUNT";
pub const FEEDBACK_COUNT: &str = "FEEDBACK_COUNT";

/// What [`fix_plan`] repaired, and how the plan validates afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub fixed: Vec<Finding>,
    pub result: ValidationResult,
}

/// Step files grouped by the number in their name.
fn files_by_number(files: Vec<StepFile>) -> BTreeMap<u32, Vec<StepFile>> {
    let mut grouped: BTreeMap<u32, Vec<StepFile>> = BTreeMap::new();
    for file in files {
        grouped.entry(file.number).or_default().push(file);
    }
    grouped
}

fn duplicate_numbers(doc: &StatusDocument) -> BTreeSet<u32> {
    let mut seen = BTreeSet::new();
    doc.rows
        .iter()
        .filter(|r| !seen.insert(r.number))
        .map(|r| r.number)
        .collect()
}

fn check_numbering(doc: &StatusDocument, result: &mut ValidationResult) {
    let duplicates = duplicate_numbers(doc);
    for number in &duplicates {
        result.push(
            Severity::Error,
            Finding::new(
                DUPLICATE_STEP_NUMBER,
                FindingCategory::Numbering,
                format!("Step {} appears more than once", step_label(*number)),
            ),
        );
    }

    if doc.rows.windows(2).any(|w| w[0].number > w[1].number) {
        result.push(
            Severity::Error,
            Finding::new(
                STEP_ORDER,
                FindingCategory::Numbering,
                "Steps are not listed in ascending order",
            )
            .fixable(),
        );
    }

    let numbers: BTreeSet<u32> = doc.rows.iter().map(|r| r.number).collect();
    let expected: BTreeSet<u32> = (1..=numbers.len() as u32).collect();
    if duplicates.is_empty() && numbers != expected {
        let missing: Vec<String> = expected.difference(&numbers).map(|n| step_label(*n)).collect();
        let message = if missing.is_empty() {
            format!("Step numbers do not run 1..={}", numbers.len())
        } else {
            format!("Step numbering has gaps; missing {}", missing.join(", "))
        };
        result.push(
            Severity::Error,
            Finding::new(STEP_NUMBERING_GAP, FindingCategory::Numbering, message).fixable(),
        );
    }
}

fn check_files(
    doc: &StatusDocument,
    files: &BTreeMap<u32, Vec<StepFile>>,
    result: &mut ValidationResult,
) {
    for (number, group) in files.iter().filter(|(_, g)| g.len() > 1) {
        let names: Vec<&str> = group.iter().map(StepFile::file_name).collect();
        result.push(
            Severity::Error,
            Finding::new(
                DUPLICATE_STEP_FILE,
                FindingCategory::Files,
                format!(
                    "Step {} has more than one file: {}",
                    step_label(*number),
                    names.join(", ")
                ),
            ),
        );
    }

    let listed: BTreeSet<u32> = doc.rows.iter().map(|r| r.number).collect();
    for number in &listed {
        if !files.contains_key(number) {
            result.push(
                Severity::Warning,
                Finding::new(
                    MISSING_STEP_FILE,
                    FindingCategory::Files,
                    format!("Step {} has no step file", step_label(*number)),
                )
                .fixable(),
            );
        }
    }

    for (number, group) in files {
        if listed.contains(number) {
            continue;
        }
        for file in group {
            result.push(
                Severity::Warning,
                Finding::new(
                    ORPHAN_STEP_FILE,
                    FindingCategory::Files,
                    format!("{} does not belong to any listed step", file.file_name()),
                ),
            );
        }
    }
}

fn check_state(doc: &StatusDocument, result: &mut ValidationResult) {
    let completed = doc
        .rows
        .iter()
        .filter(|r| r.status == StepStatus::Completed)
        .count();
    let computed = progress_percent(completed, doc.rows.len());
    if let Some(recorded) = doc.progress.filter(|p| *p != computed) {
        result.push(
            Severity::Warning,
            Finding::new(
                PROGRESS_MISMATCH,
                FindingCategory::State,
                format!("Recorded progress is {recorded}% but the steps give {computed}%"),
            )
            .fixable(),
        );
    }

    if let Some(current) = doc.current_step {
        if !doc.rows.iter().any(|r| r.number == current) {
            result.push(
                Severity::Warning,
                Finding::new(
                    CURRENT_STEP_MISSING,
                    FindingCategory::State,
                    format!("Current step {} does not exist", step_label(current)),
                )
                .fixable(),
            );
        }
    }
}

/// Steps carry no dependency data yet; the category is reserved.
fn check_dependencies(_doc: &StatusDocument, _result: &mut ValidationResult) {}

/// Validates the plan directory at `plan_dir`.
///
/// # Errors
///
/// [`PlanError::PlanNotFound`] when the directory does not exist. Anything
/// wrong inside the directory is reported as a finding, not an error.
pub fn validate_plan(plan_dir: &Path, options: &ValidateOptions) -> Result<ValidationResult> {
    if !plan_dir.is_dir() {
        return Err(PlanError::PlanNotFound {
            path: plan_dir.to_path_buf(),
        });
    }

    let mut result = ValidationResult::default();
    if !has_plan(plan_dir) {
        result.push(
            Severity::Error,
            Finding::new(
                MISSING_STATUS_DOCUMENT,
                FindingCategory::Structure,
                format!("No {} in {}", store::layout::STATUS_FILE, plan_dir.display()),
            ),
        );
        return Ok(result.finish(options.strict));
    }

    let path = status_path(plan_dir);
    let content = fs::read_to_string(&path).fs_context(&path)?;
    let doc = match parse_status(&content) {
        Ok(doc) => doc,
        Err(reason) => {
            result.push(
                Severity::Error,
                Finding::new(STATUS_PARSE_ERROR, FindingCategory::Structure, reason),
            );
            return Ok(result.finish(options.strict));
        }
    };

    if !is_valid_code(&doc.code) {
        result.push(
            Severity::Error,
            Finding::new(
                INVALID_CODE,
                FindingCategory::Structure,
                format!("Plan code '{}' is not a valid code", doc.code),
            ),
        );
    }

    let files = files_by_number(scan_step_files(plan_dir)?);
    check_numbering(&doc, &mut result);
    check_files(&doc, &files, &mut result);
    check_state(&doc, &mut result);
    check_dependencies(&doc, &mut result);

    result.push(
        Severity::Info,
        Finding::new(
            STEP_COUNT,
            FindingCategory::Structure,
            format!("{} steps", doc.rows.len()),
        ),
    );
    result.push(
        Severity::Info,
        Finding::new(
            FEEDBACK_COUNT,
            FindingCategory::Structure,
            format!("{} feedback records", count_feedback(plan_dir)?),
        ),
    );

    Ok(result.finish(options.strict))
}

/// Renames step files to follow `mapping` (old number to new), going through
/// temporary names so swaps and shifts in either direction are safe.
fn renumber_step_files(
    plan_dir: &Path,
    files: &BTreeMap<u32, Vec<StepFile>>,
    mapping: &HashMap<u32, u32>,
    titles: &HashMap<u32, String>,
) -> Result<()> {
    let mut moves: Vec<(PathBuf, PathBuf, u32)> = Vec::new();
    for (old, new) in mapping.iter().filter(|(old, new)| old != new) {
        let Some(file) = files.get(old).and_then(|g| g.first()) else {
            continue;
        };
        let Some(name) = renumbered_file_name(file.file_name(), *new) else {
            continue;
        };
        moves.push((file.path.clone(), file.path.with_file_name(name), *new));
    }

    let moving: BTreeSet<&PathBuf> = moves.iter().map(|(from, _, _)| from).collect();
    let targets: BTreeSet<u32> = moves.iter().map(|(_, _, number)| *number).collect();
    if let Some(holder) = files
        .values()
        .flatten()
        .find(|f| targets.contains(&f.number) && !moving.contains(&f.path))
    {
        return Err(PlanError::corrupt(plan_dir).with_reason(format!(
            "cannot renumber steps: {} already holds step {}",
            holder.file_name(),
            step_label(holder.number)
        )));
    }
    if let Some((_, to, _)) = moves
        .iter()
        .find(|(_, to, _)| to.exists() && !moving.contains(to))
    {
        return Err(PlanError::corrupt(plan_dir).with_reason(format!(
            "cannot renumber steps: {} is in the way",
            to.display()
        )));
    }

    let mut staged = Vec::with_capacity(moves.len());
    for (from, to, number) in moves {
        let name = from.file_name().and_then(|n| n.to_str()).unwrap_or("step");
        let tmp = from.with_file_name(format!(".renumber-{name}"));
        fs::rename(&from, &tmp).fs_context(&from)?;
        staged.push((tmp, to, number));
    }
    for (tmp, to, number) in staged {
        fs::rename(&tmp, &to).fs_context(&tmp)?;
        if let Some(title) = titles.get(&number) {
            let content = fs::read_to_string(&to).fs_context(&to)?;
            fs::write(&to, rewrite_step_heading(&content, number, title)).fs_context(&to)?;
        }
        debug!("Renumbered step file to {}", to.display());
    }
    Ok(())
}

/// Applies every fixable finding and rewrites the status document.
///
/// Rows are sorted and renumbered `1..=N` (with their step files), missing
/// step files are recreated, a dangling current step is cleared and progress
/// is recomputed. Numbering is left alone while duplicate numbers or
/// duplicate step files exist, since fixing those needs a person.
///
/// # Errors
///
/// [`PlanError::PlanNotFound`] when the directory does not exist, or any I/O
/// error from the repair itself.
pub fn fix_plan(plan_dir: &Path) -> Result<FixReport> {
    let before = validate_plan(plan_dir, &ValidateOptions::default())?;
    if before.fixable.is_empty() || before.has(MISSING_STATUS_DOCUMENT) || before.has(STATUS_PARSE_ERROR) {
        return Ok(FixReport {
            fixed: Vec::new(),
            result: before,
        });
    }

    let mut doc = store::read_status_document(plan_dir)?;
    let files = files_by_number(scan_step_files(plan_dir)?);
    let mut fixed = Vec::new();

    let numbering_blocked = before.has(DUPLICATE_STEP_NUMBER) || before.has(DUPLICATE_STEP_FILE);
    if numbering_blocked {
        warn!("Leaving step numbering of {} alone: duplicates need manual repair", plan_dir.display());
    } else if before.has(STEP_ORDER) || before.has(STEP_NUMBERING_GAP) {
        doc.rows.sort_by_key(|r| r.number);
        let mapping: HashMap<u32, u32> = doc
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.number, i as u32 + 1))
            .collect();
        let titles: HashMap<u32, String> = doc
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i as u32 + 1, r.title.clone()))
            .collect();

        renumber_step_files(plan_dir, &files, &mapping, &titles)?;
        for row in &mut doc.rows {
            row.number = mapping.get(&row.number).copied().unwrap_or(row.number);
        }
        doc.current_step = doc.current_step.map(|n| mapping.get(&n).copied().unwrap_or(n));
        for blocker in &mut doc.blockers {
            blocker.step = blocker.step.map(|n| mapping.get(&n).copied().unwrap_or(n));
        }
        fixed.extend(
            before
                .fixable
                .iter()
                .filter(|f| f.code == STEP_ORDER || f.code == STEP_NUMBERING_GAP)
                .cloned(),
        );
    }

    if doc
        .current_step
        .is_some_and(|n| !doc.rows.iter().any(|r| r.number == n))
    {
        doc.current_step = None;
    }
    let plan = store::assemble(plan_dir, doc)?;

    if before.has(MISSING_STEP_FILE) {
        let present: BTreeSet<u32> = scan_step_files(plan_dir)?.iter().map(|f| f.number).collect();
        for step in plan.steps.iter().filter(|s| !present.contains(&s.number)) {
            store::write_new_step_file(plan_dir, step)?;
        }
    }

    store::save(&plan)?;

    fixed.extend(
        before
            .fixable
            .iter()
            .filter(|f| {
                matches!(
                    f.code.as_str(),
                    MISSING_STEP_FILE | PROGRESS_MISMATCH | CURRENT_STEP_MISSING
                )
            })
            .cloned(),
    );
    info!("Fixed {} findings in {}", fixed.len(), plan_dir.display());

    let result = validate_plan(plan_dir, &ValidateOptions::default())?;
    Ok(FixReport { fixed, result })
}
