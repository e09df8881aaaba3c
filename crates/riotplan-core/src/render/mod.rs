//! Status document rendering.
//!
//! `STATUS.md` is both the human-readable summary of a plan and the store's
//! source of truth for plan state. The renderer owns a single block delimited
//! by [`BEGIN_MARKER`] and [`END_MARKER`]; anything a person writes outside
//! that block is carried over verbatim on every regeneration.
//!
//! ```text
//! ┌──────────────────────┐
//! │ hand-written prefix  │  preserved
//! ├──────────────────────┤
//! │ <!-- ...:begin -->   │
//! │ managed block        │  regenerated from the Plan
//! │ <!-- ...:end -->     │
//! ├──────────────────────┤
//! │ hand-written suffix  │  preserved
//! └──────────────────────┘
//! ```
//!
//! Generation reads no clock, so the same plan always renders the same text
//! and regeneration is idempotent.

mod parse;

use std::fmt;

pub use parse::{parse_status, StatusDocument, StatusRow};

use crate::models::{Blocker, Plan};

/// Opens the renderer-owned block.
pub const BEGIN_MARKER: &str = "<!-- riotplan:status:begin -->";
/// Closes the renderer-owned block.
pub const END_MARKER: &str = "<!-- riotplan:status:end -->";

pub(crate) const STEPS_HEADING: &str = "## Steps";
pub(crate) const BLOCKERS_HEADING: &str = "## Blockers";
pub(crate) const TABLE_HEADER: &str = "| Step | Title | Status | Notes | Block Reason |";
const TABLE_SEPARATOR: &str = "|------|-------|--------|-------|--------------|";

/// Formats a step number the way step files are prefixed.
pub fn step_label(number: u32) -> String {
    format!("{number:02}")
}

/// Escapes a value for a single markdown table cell.
pub(crate) fn escape_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            // Keeps a typed `<br>` apart from an encoded line break
            '<' => out.push_str("\\<"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Renders a blocker as a list item.
pub(crate) fn blocker_line(blocker: &Blocker) -> String {
    let description = blocker.description.replace(['\r', '\n'], " ");
    match blocker.step {
        Some(step) => format!(
            "- Step {}: {} (since {})",
            step_label(step),
            description,
            blocker.created_at
        ),
        None => format!("- {} (since {})", description, blocker.created_at),
    }
}

/// The managed block, markers included.
struct ManagedBlock<'a>(&'a Plan);

impl fmt::Display for ManagedBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        let state = &plan.state;

        writeln!(f, "{BEGIN_MARKER}")?;
        writeln!(f, "# {}", plan.metadata.name)?;
        writeln!(f)?;
        writeln!(f, "- **Code**: {}", plan.metadata.code)?;
        writeln!(f, "- **Status**: {}", state.status.with_icon())?;
        writeln!(
            f,
            "- **Progress**: {}% ({}/{} steps)",
            state.progress,
            plan.completed_count(),
            plan.steps.len()
        )?;
        if let Some(current) = state.current_step {
            match plan.step(current) {
                Some(step) => {
                    writeln!(f, "- **Current Step**: {} - {}", step_label(current), step.title)?
                }
                None => writeln!(f, "- **Current Step**: {}", step_label(current))?,
            }
        }
        writeln!(f, "- **Last Updated**: {}", state.last_updated_at)?;
        if let Some(completed_at) = state.completed_at {
            writeln!(f, "- **Completed**: {completed_at}")?;
        }

        if let Some(description) = &plan.metadata.description {
            writeln!(f)?;
            for line in description.lines() {
                if line.is_empty() {
                    writeln!(f, ">")?;
                } else {
                    writeln!(f, "> {line}")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{STEPS_HEADING}")?;
        writeln!(f)?;
        writeln!(f, "{TABLE_HEADER}")?;
        writeln!(f, "{TABLE_SEPARATOR}")?;
        let mut steps: Vec<_> = plan.steps.iter().collect();
        steps.sort_by_key(|s| s.number);
        for step in steps {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} |",
                step_label(step.number),
                escape_cell(&step.title),
                step.status.with_icon(),
                escape_cell(step.notes.as_deref().unwrap_or_default()),
                escape_cell(step.block_reason.as_deref().unwrap_or_default()),
            )?;
        }

        if !state.blockers.is_empty() {
            writeln!(f)?;
            writeln!(f, "{BLOCKERS_HEADING}")?;
            writeln!(f)?;
            for blocker in &state.blockers {
                writeln!(f, "{}", blocker_line(blocker))?;
            }
        }

        writeln!(f, "{END_MARKER}")
    }
}

/// Splits existing content into the text before and after the managed block.
///
/// Returns `None` when the content has no begin marker.
fn split_unmanaged(existing: &str) -> Option<(&str, &str)> {
    let begin = existing.find(BEGIN_MARKER)?;
    let prefix = &existing[..begin];
    let rest = &existing[begin..];

    let suffix = match rest.find(END_MARKER) {
        Some(end) => {
            let after = &rest[end + END_MARKER.len()..];
            match after.find('\n') {
                Some(newline) => &after[newline + 1..],
                None => "",
            }
        }
        // An unterminated block swallows the rest of the file.
        None => "",
    };
    Some((prefix, suffix))
}

/// Generates the status document for `plan`.
///
/// When `existing` content is supplied, text outside the managed block is
/// kept in place. Content without markers is treated as entirely
/// hand-written and kept below the block.
///
/// # Examples
///
/// ```rust
/// use std::path::PathBuf;
///
/// use jiff::Timestamp;
/// use riotplan_core::models::{Plan, PlanMetadata, PlanState};
/// use riotplan_core::render::generate_status;
///
/// let plan = Plan {
///     path: PathBuf::from("my-plan"),
///     metadata: PlanMetadata {
///         code: "my-plan".to_string(),
///         name: "My Plan".to_string(),
///         description: None,
///     },
///     state: PlanState::new(Timestamp::UNIX_EPOCH),
///     steps: vec![],
/// };
///
/// let first = generate_status(&plan, None);
/// assert!(first.contains("0% (0/0 steps)"));
/// assert_eq!(generate_status(&plan, Some(&first)), first);
/// ```
pub fn generate_status(plan: &Plan, existing: Option<&str>) -> String {
    let block = ManagedBlock(plan).to_string();

    let Some(existing) = existing else {
        return block;
    };

    match split_unmanaged(existing) {
        Some((prefix, suffix)) => format!("{prefix}{block}{suffix}"),
        None if existing.trim().is_empty() => block,
        None => format!("{block}\n{existing}"),
    }
}
