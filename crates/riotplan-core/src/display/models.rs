//! Display implementations for domain models.
//!
//! The Display implementations provide markdown for rich terminal display,
//! with status icons and structured sections.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{FeedbackRecord, Finding, Plan, Step, StepStatus, ValidationResult},
    render::step_label,
};

/// A plan's header, state and blockers, without the step list.
pub struct PlanSummary<'a>(pub &'a Plan);

impl fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        writeln!(f, "# {} ({})", plan.metadata.name, plan.metadata.code)?;
        writeln!(f)?;

        writeln!(f, "- **Status**: {}", plan.state.status.with_icon())?;
        writeln!(
            f,
            "- **Progress**: {}% ({}/{} steps)",
            plan.state.progress,
            plan.completed_count(),
            plan.steps.len()
        )?;
        if let Some(current) = plan.state.current_step.and_then(|n| plan.step(n)) {
            writeln!(
                f,
                "- **Current Step**: {} - {}",
                step_label(current.number),
                current.title
            )?;
        }
        writeln!(f, "- **Path**: {}", plan.path.display())?;
        writeln!(
            f,
            "- **Last Updated**: {}",
            LocalDateTime(&plan.state.last_updated_at)
        )?;
        if let Some(completed_at) = &plan.state.completed_at {
            writeln!(f, "- **Completed**: {}", LocalDateTime(completed_at))?;
        }

        if let Some(desc) = &plan.metadata.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !plan.state.blockers.is_empty() {
            writeln!(f, "\n## Blockers")?;
            writeln!(f)?;
            for blocker in &plan.state.blockers {
                match blocker.step {
                    Some(step) => writeln!(f, "- Step {}: {}", step_label(step), blocker.description)?,
                    None => writeln!(f, "- {}", blocker.description)?,
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PlanSummary(self))?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            step_label(self.number),
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        if self.status == StepStatus::Blocked {
            if let Some(reason) = &self.block_reason {
                writeln!(f, "#### Blocked")?;
                writeln!(f)?;
                writeln!(f, "{reason}")?;
                writeln!(f)?;
            }
        }

        if let Some(notes) = &self.notes {
            writeln!(f, "#### Notes")?;
            writeln!(f)?;
            writeln!(f, "{notes}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for FeedbackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.id)?;
        writeln!(f)?;

        if let Some(step) = self.step {
            writeln!(f, "- **Step**: {}", step_label(step))?;
        }
        if let Some(platform) = &self.platform {
            writeln!(f, "- **Platform**: {platform}")?;
        }
        if !self.participants.is_empty() {
            let names: Vec<String> = self
                .participants
                .iter()
                .map(|p| format!("{} ({})", p.name, p.kind.as_str()))
                .collect();
            writeln!(f, "- **Participants**: {}", names.join(", "))?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;

        if let Some(summary) = &self.summary {
            writeln!(f)?;
            writeln!(f, "{summary}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}**: {}", self.code, self.message)?;
        if self.fixable {
            write!(f, " _(fixable)_")?;
        }
        Ok(())
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            writeln!(f, "✅ Plan is valid")?;
        } else {
            writeln!(f, "❌ Plan is invalid")?;
        }

        for (heading, findings) in [
            ("Errors", &self.errors),
            ("Warnings", &self.warnings),
            ("Info", &self.info),
        ] {
            if findings.is_empty() {
                continue;
            }
            writeln!(f, "\n## {heading}")?;
            writeln!(f)?;
            for finding in findings {
                writeln!(f, "- {finding}")?;
            }
        }

        if !self.fixable.is_empty() {
            writeln!(
                f,
                "\n{} finding(s) can be repaired with `--fix`.",
                self.fixable.len()
            )?;
        }
        Ok(())
    }
}
