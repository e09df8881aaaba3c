//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::StepChange,
    render::step_label,
    store::{ArchivedPlan, CreatedFeedback, CreatedPlan, InsertedStep, RemovedStep, RenamedFile},
    validate::FixReport,
};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

fn write_renames(f: &mut fmt::Formatter<'_>, renamed: &[RenamedFile]) -> fmt::Result {
    if renamed.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "Renumbered files:")?;
    for rename in renamed {
        let name = |p: &std::path::Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        writeln!(f, "- {} → {}", name(&rename.from), name(&rename.to))?;
    }
    Ok(())
}

impl fmt::Display for CreateResult<CreatedPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created = &self.resource;
        writeln!(
            f,
            "Created plan '{}' at {}",
            created.plan.metadata.code,
            created.path.display()
        )?;
        writeln!(f)?;
        writeln!(f, "Files written:")?;
        for file in &created.files_created {
            writeln!(f, "- {}", file.display())?;
        }
        writeln!(f)?;
        write!(f, "{}", created.plan)
    }
}

impl fmt::Display for CreateResult<InsertedStep> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inserted = &self.resource;
        writeln!(
            f,
            "Inserted step {}: {}",
            step_label(inserted.step.number),
            inserted.step.title
        )?;
        writeln!(f, "- **File**: {}", inserted.created_file.display())?;
        write_renames(f, &inserted.renamed_files)
    }
}

impl fmt::Display for CreateResult<CreatedFeedback> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recorded feedback {}", self.resource.record.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource.record)
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// changes that were made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<StepChange> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let StepChange { plan, step } = &self.resource;
        writeln!(f, "Updated step {}: {}", step_label(step.number), step.title)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "- **Plan Status**: {}", plan.state.status.with_icon())?;
        writeln!(
            f,
            "- **Progress**: {}% ({}/{} steps)",
            plan.state.progress,
            plan.completed_count(),
            plan.steps.len()
        )
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<RemovedStep> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let removed = &self.resource.removed_step;
        writeln!(
            f,
            "Removed step {}: {}",
            step_label(removed.number),
            removed.title
        )?;
        write_renames(f, &self.resource.renamed_files)
    }
}

impl fmt::Display for ArchivedPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Archived plan '{}' ({})",
            self.plan.metadata.code,
            self.plan.state.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- **From**: {}", self.from.display())?;
        writeln!(f, "- **To**: {}", self.to.display())
    }
}

impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fixed.is_empty() {
            writeln!(f, "Nothing to fix.")?;
        } else {
            writeln!(f, "Fixed {} finding(s):", self.fixed.len())?;
            writeln!(f)?;
            for finding in &self.fixed {
                writeln!(f, "- {finding}")?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.result)
    }
}
