//! Step insertion, removal and renumbering.
//!
//! Everything here is pure: the input plan is never modified and the
//! renumbering is computed in full on a copy before the new plan is returned.
//! Renaming step files to follow the new numbers is the store's job; the
//! [`Renumbering`] list tells it what moved.

use jiff::Timestamp;
use serde::Serialize;

use crate::{
    error::{PlanError, Result},
    models::{Plan, Step},
    params::{InsertStep, StatusUpdate},
};

/// A step that changed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Renumbering {
    pub from: u32,
    pub to: u32,
}

/// Result of inserting a step.
#[derive(Debug, Clone)]
pub struct Insertion {
    pub plan: Plan,
    pub step: Step,
    /// Existing steps shifted up, highest number first
    pub renumbered: Vec<Renumbering>,
}

/// Result of removing a step.
#[derive(Debug, Clone)]
pub struct Removal {
    pub plan: Plan,
    pub removed: Step,
    /// Following steps shifted down, lowest number first
    pub renumbered: Vec<Renumbering>,
}

/// Resolves the 1-based number a new step will receive.
fn target_position(plan: &Plan, params: &InsertStep) -> Result<u32> {
    let count = plan.steps.len() as u32;

    if let Some(position) = params.position {
        if position < 1 || position > count + 1 {
            return Err(PlanError::InvalidPosition {
                reason: format!("position {position} is out of range 1..={}", count + 1),
            });
        }
        return Ok(position);
    }

    if let Some(after) = params.after {
        if plan.step(after).is_none() {
            return Err(PlanError::InvalidPosition {
                reason: format!("cannot insert after step {after}: no such step"),
            });
        }
        return Ok(after + 1);
    }

    Ok(count + 1)
}

/// Applies a number mapping to the references plan state holds.
fn remap_state(plan: &mut Plan, map: impl Fn(u32) -> Option<u32>) {
    plan.state.current_step = plan.state.current_step.and_then(&map);
    plan.state.blockers.retain_mut(|b| match b.step {
        Some(n) => match map(n) {
            Some(to) => {
                b.step = Some(to);
                true
            }
            None => false,
        },
        None => true,
    });
}

/// Inserts a new pending step.
///
/// # Errors
///
/// [`PlanError::InvalidPosition`] for an out-of-range `position` or an
/// unknown `after` step, [`PlanError::InvalidInput`] for an empty title.
pub fn insert_step(plan: &Plan, params: &InsertStep) -> Result<Insertion> {
    insert_step_at(plan, params, Timestamp::now())
}

/// [`insert_step`] with an explicit clock.
pub fn insert_step_at(plan: &Plan, params: &InsertStep, now: Timestamp) -> Result<Insertion> {
    if params.title.trim().is_empty() {
        return Err(PlanError::invalid_input("title").with_reason("step title cannot be empty"));
    }
    let position = target_position(plan, params)?;

    let renumbered: Vec<Renumbering> = plan
        .steps
        .iter()
        .rev()
        .filter(|s| s.number >= position)
        .map(|s| Renumbering {
            from: s.number,
            to: s.number + 1,
        })
        .collect();

    let step = Step::new(position, params.title.trim(), params.description.clone());

    let mut next = plan.clone();
    let mut steps: Vec<Step> = next
        .steps
        .into_iter()
        .map(|mut s| {
            if s.number >= position {
                s.number += 1;
            }
            s
        })
        .collect();
    steps.insert(position as usize - 1, step.clone());
    next.steps = steps;
    remap_state(&mut next, |n| Some(if n >= position { n + 1 } else { n }));

    let next = next.update_status_at(&StatusUpdate::default(), now);
    debug_assert!(next.is_densely_numbered());

    Ok(Insertion {
        plan: next,
        step,
        renumbered,
    })
}

/// Removes a step and closes the gap it leaves.
///
/// Removal is unconditional: the last step or an in-progress step may be
/// removed like any other.
///
/// # Errors
///
/// [`PlanError::StepNotFound`] if `number` is not in the plan.
pub fn remove_step(plan: &Plan, number: u32) -> Result<Removal> {
    remove_step_at(plan, number, Timestamp::now())
}

/// [`remove_step`] with an explicit clock.
pub fn remove_step_at(plan: &Plan, number: u32, now: Timestamp) -> Result<Removal> {
    let removed = plan.require_step(number)?.clone();

    let renumbered: Vec<Renumbering> = plan
        .steps
        .iter()
        .filter(|s| s.number > number)
        .map(|s| Renumbering {
            from: s.number,
            to: s.number - 1,
        })
        .collect();

    let mut next = plan.clone();
    next.steps = next
        .steps
        .into_iter()
        .filter(|s| s.number != number)
        .map(|mut s| {
            if s.number > number {
                s.number -= 1;
            }
            s
        })
        .collect();
    remap_state(&mut next, |n| match n {
        n if n == number => None,
        n if n > number => Some(n - 1),
        n => Some(n),
    });

    let next = next.update_status_at(&StatusUpdate::default(), now);
    debug_assert!(next.is_densely_numbered());

    Ok(Removal {
        plan: next,
        removed,
        renumbered,
    })
}
