//! Validation findings and results.

use serde::{Deserialize, Serialize};

/// Which family of checks produced a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Structure,
    Numbering,
    Files,
    State,
    Dependencies,
}

/// How a finding counts towards the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    /// Stable identifier such as `STEP_NUMBERING_GAP`
    pub code: String,
    pub message: String,
    pub category: FindingCategory,
    /// Whether the engine can repair this without human judgment
    pub fixable: bool,
}

impl Finding {
    pub fn new(code: &str, category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            category,
            fixable: false,
        }
    }

    /// Marks the finding as automatically repairable.
    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }
}

/// Outcome of validating a plan. Transient; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
    /// Findings (errors and warnings) the engine can repair
    pub fixable: Vec<Finding>,
}

impl ValidationResult {
    /// Files a finding under the given severity.
    pub fn push(&mut self, severity: Severity, finding: Finding) {
        if finding.fixable {
            self.fixable.push(finding.clone());
        }
        match severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    /// Computes the verdict. `strict` treats warnings as errors but does not
    /// move any finding between lists.
    pub fn finish(mut self, strict: bool) -> Self {
        self.valid = self.errors.is_empty() && (!strict || self.warnings.is_empty());
        self
    }

    /// Whether a finding with `code` was produced at any severity.
    pub fn has(&self, code: &str) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.info)
            .any(|f| f.code == code)
    }
}
