//! Append-only feedback log.
//!
//! Each record lives in `feedback/<id>.json`. Ids are `NNN-<slug>`: the
//! sequence is one past the highest already on disk, so records created with
//! identical titles still get distinct ids, and a file is never overwritten.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::{info, warn};

use super::layout::{has_plan, slugify, FEEDBACK_DIR};
use crate::error::{IoResultExt, PlanError, Result};
use crate::models::{FeedbackRecord, Participant};
use crate::params::CreateFeedback;

/// A newly written feedback record and its file.
#[derive(Debug, Clone)]
pub struct CreatedFeedback {
    pub record: FeedbackRecord,
    pub file_path: PathBuf,
}

fn sequence_of(id: &str) -> Option<u32> {
    let digits: String = id.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Ids are file stems; anything that could escape the feedback directory is
/// rejected up front.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn record_ids(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir).fs_context(dir)? {
        let path = entry.fs_context(dir)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort_by(|a, b| sequence_of(a).cmp(&sequence_of(b)).then_with(|| a.cmp(b)));
    Ok(ids)
}

fn require_plan(plan_dir: &Path) -> Result<()> {
    if has_plan(plan_dir) {
        Ok(())
    } else {
        Err(PlanError::PlanNotFound {
            path: plan_dir.to_path_buf(),
        })
    }
}

/// Records a new piece of feedback.
///
/// The optional step number is stored as given; it is not checked against
/// the plan's current steps.
pub fn create_feedback(
    plan_dir: &Path,
    params: &CreateFeedback,
    default_participants: &[Participant],
) -> Result<CreatedFeedback> {
    require_plan(plan_dir)?;
    let title = params.title.trim();
    if title.is_empty() {
        return Err(PlanError::invalid_input("title").with_reason("feedback title cannot be empty"));
    }

    let dir = plan_dir.join(FEEDBACK_DIR);
    fs::create_dir_all(&dir).fs_context(&dir)?;

    let next = record_ids(&dir)?
        .iter()
        .filter_map(|id| sequence_of(id))
        .max()
        .unwrap_or(0)
        + 1;
    let id = format!("{next:03}-{}", slugify(title));

    let participants = if params.participants.is_empty() {
        default_participants.to_vec()
    } else {
        params.participants.clone()
    };

    let record = FeedbackRecord {
        id: id.clone(),
        title: title.to_string(),
        summary: params.summary.clone(),
        step: params.step,
        platform: params.platform.clone(),
        participants,
        created_at: Timestamp::now(),
    };

    let file_path = dir.join(format!("{id}.json"));
    let json = serde_json::to_string_pretty(&record)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&file_path)
        .fs_context(&file_path)?;
    file.write_all(json.as_bytes()).fs_context(&file_path)?;
    file.write_all(b"\n").fs_context(&file_path)?;

    info!("Recorded feedback {id} in {}", plan_dir.display());
    Ok(CreatedFeedback { record, file_path })
}

/// All feedback records, in creation order.
pub fn list_feedback(plan_dir: &Path) -> Result<Vec<FeedbackRecord>> {
    require_plan(plan_dir)?;
    let dir = plan_dir.join(FEEDBACK_DIR);

    let mut records = Vec::new();
    for id in record_ids(&dir)? {
        let path = dir.join(format!("{id}.json"));
        let content = fs::read_to_string(&path).fs_context(&path)?;
        match serde_json::from_str::<FeedbackRecord>(&content) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping unreadable feedback record {}: {e}", path.display()),
        }
    }
    Ok(records)
}

/// Looks up one record; `None` for unknown or malformed ids.
pub fn get_feedback(plan_dir: &Path, id: &str) -> Result<Option<FeedbackRecord>> {
    require_plan(plan_dir)?;
    if !is_valid_id(id) {
        return Ok(None);
    }

    let path = plan_dir.join(FEEDBACK_DIR).join(format!("{id}.json"));
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).fs_context(&path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Number of feedback records on disk, without parsing them.
pub fn count_feedback(plan_dir: &Path) -> Result<usize> {
    Ok(record_ids(&plan_dir.join(FEEDBACK_DIR))?.len())
}
