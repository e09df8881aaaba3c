//! Feedback log operations for the Planner.

use std::path::Path;

use super::Planner;
use crate::{
    error::{PlanError, Result},
    models::FeedbackRecord,
    params::CreateFeedback,
    store::{self, CreatedFeedback},
};

impl Planner {
    /// Appends a feedback record to the plan in `path`.
    ///
    /// Records naming no participants get the configured default participant.
    pub fn create_feedback(&self, path: &Path, params: &CreateFeedback) -> Result<CreatedFeedback> {
        store::create_feedback(path, params, &self.config.default_participants())
    }

    /// All feedback records of the plan, oldest first.
    pub fn list_feedback(&self, path: &Path) -> Result<Vec<FeedbackRecord>> {
        store::list_feedback(path)
    }

    /// Looks up one feedback record.
    pub fn get_feedback(&self, path: &Path, id: &str) -> Result<Option<FeedbackRecord>> {
        store::get_feedback(path, id)
    }

    /// Like [`get_feedback`](Self::get_feedback), failing with
    /// `FeedbackNotFound` for unknown ids.
    pub fn show_feedback(&self, path: &Path, id: &str) -> Result<FeedbackRecord> {
        self.get_feedback(path, id)?
            .ok_or_else(|| PlanError::FeedbackNotFound { id: id.to_string() })
    }
}
