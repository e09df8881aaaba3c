//! Step operations for the Planner.

use super::Planner;
use crate::{
    editor,
    error::Result,
    models::{Plan, StepAction, StepChange},
    params::{InsertStep, StatusUpdate},
    store::{self, InsertedStep, RemovedStep},
};

impl Planner {
    /// Inserts a step, shifting later steps and their files, and persists the
    /// plan.
    pub fn insert_step(&self, plan: &Plan, params: &InsertStep) -> Result<InsertedStep> {
        store::apply_insertion(editor::insert_step(plan, params)?)
    }

    /// Removes a step and its file, closing the gap, and persists the plan.
    pub fn remove_step(&self, plan: &Plan, number: u32) -> Result<RemovedStep> {
        store::apply_removal(editor::remove_step(plan, number)?)
    }

    /// Moves a pending or blocked step to in progress.
    pub fn start_step(&self, plan: &Plan, number: u32) -> Result<StepChange> {
        plan.apply_step_action(number, &StepAction::Start)
    }

    /// Completes a pending or in-progress step.
    pub fn complete_step(
        &self,
        plan: &Plan,
        number: u32,
        notes: Option<String>,
    ) -> Result<StepChange> {
        plan.apply_step_action(number, &StepAction::Complete { notes })
    }

    /// Blocks a step that has not reached a terminal status.
    pub fn block_step(&self, plan: &Plan, number: u32, reason: &str) -> Result<StepChange> {
        plan.apply_step_action(
            number,
            &StepAction::Block {
                reason: reason.to_string(),
            },
        )
    }

    /// Returns a blocked step to pending.
    pub fn unblock_step(&self, plan: &Plan, number: u32) -> Result<StepChange> {
        plan.apply_step_action(number, &StepAction::Unblock)
    }

    /// Skips a pending or blocked step.
    pub fn skip_step(
        &self,
        plan: &Plan,
        number: u32,
        reason: Option<String>,
    ) -> Result<StepChange> {
        plan.apply_step_action(number, &StepAction::Skip { reason })
    }

    /// Recomputes plan state, optionally forcing one step's status first.
    pub fn update_status(&self, plan: &Plan, update: &StatusUpdate) -> Plan {
        plan.update_status(update)
    }
}
