//! Tests for the planner module.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::{
    error::PlanError,
    models::{Participant, PlanStatus, StepStatus},
    params::{ArchivePlan, CreateFeedback, CreatePlan, InsertStep, StatusUpdate, StepSpec},
};

/// Helper function to create a test planner with a three-step plan
fn create_test_planner() -> (TempDir, Planner, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = PlannerBuilder::new()
        .with_config(Config::default())
        .build()
        .expect("Failed to create planner");
    let created = planner
        .create_plan(&CreatePlan {
            code: "test-plan".to_string(),
            name: "Test Plan".to_string(),
            base_path: temp_dir.path().to_path_buf(),
            description: Some("Test Description".to_string()),
            steps: vec![
                StepSpec::new("Setup"),
                StepSpec::new("Build"),
                StepSpec::new("Ship"),
            ],
        })
        .expect("Failed to create plan");
    (temp_dir, planner, created.path)
}

#[test]
fn test_builder_applies_archive_override() {
    let planner = PlannerBuilder::new()
        .with_config(Config::default())
        .with_archive_dir(Some("/srv/archive"))
        .build()
        .expect("Failed to create planner");
    assert_eq!(
        planner.config().archive_dir.as_deref(),
        Some(Path::new("/srv/archive"))
    );
}

#[test]
fn test_archive_target_resolution() {
    let planner = PlannerBuilder::new()
        .with_config(Config::default())
        .build()
        .unwrap();
    let plan_path = Path::new("/work/plans/feature");

    assert_eq!(
        planner.archive_target(plan_path, &ArchivePlan::default()),
        PathBuf::from("/work/plans/archive")
    );
    assert_eq!(
        planner.archive_target(Path::new("feature"), &ArchivePlan::default()),
        PathBuf::from("./archive")
    );

    let configured = PlannerBuilder::new()
        .with_config(Config::default())
        .with_archive_dir(Some("/srv/archive"))
        .build()
        .unwrap();
    assert_eq!(
        configured.archive_target(plan_path, &ArchivePlan::default()),
        PathBuf::from("/srv/archive")
    );
    assert_eq!(
        configured.archive_target(
            plan_path,
            &ArchivePlan {
                target: Some(PathBuf::from("/elsewhere")),
                ..Default::default()
            }
        ),
        PathBuf::from("/elsewhere")
    );
}

#[test]
fn test_transitions_are_pure_until_saved() {
    let (_temp_dir, planner, path) = create_test_planner();
    let plan = planner.load_plan(&path).unwrap();

    let change = planner.start_step(&plan, 1).expect("Failed to start step");
    assert_eq!(change.step.status, StepStatus::InProgress);
    assert_eq!(change.plan.state.current_step, Some(1));

    let on_disk = planner.load_plan(&path).unwrap();
    assert_eq!(on_disk.steps[0].status, StepStatus::Pending);

    planner.save_plan(&change.plan).expect("Failed to save plan");
    let reloaded = planner.load_plan(&path).unwrap();
    assert_eq!(reloaded.steps[0].status, StepStatus::InProgress);
    assert_eq!(reloaded.state.status, PlanStatus::InProgress);
}

#[test]
fn test_block_requires_reason() {
    let (_temp_dir, planner, path) = create_test_planner();
    let plan = planner.load_plan(&path).unwrap();

    let err = planner.block_step(&plan, 2, "   ").unwrap_err();
    assert!(matches!(err, PlanError::InvalidInput { .. }));

    let blocked = planner.block_step(&plan, 2, "waiting on review").unwrap();
    assert_eq!(blocked.plan.state.blockers.len(), 1);
    let unblocked = planner.unblock_step(&blocked.plan, 2).unwrap();
    assert!(unblocked.plan.state.blockers.is_empty());
    assert_eq!(unblocked.step.block_reason, None);
}

#[test]
fn test_skip_and_complete_finish_plan() {
    let (_temp_dir, planner, path) = create_test_planner();
    let plan = planner.load_plan(&path).unwrap();

    let plan = planner.complete_step(&plan, 1, None).unwrap().plan;
    let plan = planner
        .skip_step(&plan, 2, Some("not needed".to_string()))
        .unwrap()
        .plan;
    assert_eq!(plan.state.status, PlanStatus::InProgress);

    let plan = planner
        .complete_step(&plan, 3, Some("shipped".to_string()))
        .unwrap()
        .plan;
    assert_eq!(plan.state.status, PlanStatus::Completed);
    assert!(plan.state.completed_at.is_some());
    // Skipped steps finish a plan but do not count as progress
    assert_eq!(plan.state.progress, 67);
    assert_eq!(plan.steps[1].notes.as_deref(), Some("not needed"));
}

#[test]
fn test_update_status_forces_step_status() {
    let (_temp_dir, planner, path) = create_test_planner();
    let plan = planner.load_plan(&path).unwrap();

    let updated = planner.update_status(
        &plan,
        &StatusUpdate {
            step: Some(3),
            step_status: Some(StepStatus::Failed),
        },
    );
    assert_eq!(updated.steps[2].status, StepStatus::Failed);
    assert_eq!(updated.state.status, PlanStatus::InProgress);
    assert_eq!(plan.steps[2].status, StepStatus::Pending);
}

#[test]
fn test_insert_and_remove_persist() {
    let (_temp_dir, planner, path) = create_test_planner();
    let plan = planner.load_plan(&path).unwrap();

    let inserted = planner
        .insert_step(
            &plan,
            &InsertStep {
                title: "Design".to_string(),
                description: Some("Sketch the API".to_string()),
                position: None,
                after: Some(1),
            },
        )
        .expect("Failed to insert step");
    assert_eq!(inserted.step.number, 2);
    assert!(inserted.created_file.ends_with("plan/02-design.md"));
    assert_eq!(inserted.renamed_files.len(), 2);

    let reloaded = planner.load_plan(&path).unwrap();
    let titles: Vec<&str> = reloaded.steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Setup", "Design", "Build", "Ship"]);
    assert_eq!(reloaded.steps[1].description.as_deref(), Some("Sketch the API"));

    let removed = planner.remove_step(&reloaded, 1).expect("Failed to remove step");
    assert_eq!(removed.removed_step.title, "Setup");
    let reloaded = planner.load_plan(&path).unwrap();
    let numbered: Vec<(u32, &str)> = reloaded
        .steps
        .iter()
        .map(|s| (s.number, s.title.as_str()))
        .collect();
    assert_eq!(numbered, vec![(1, "Design"), (2, "Build"), (3, "Ship")]);
}

#[test]
fn test_feedback_uses_configured_participant() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = PlannerBuilder::new()
        .with_config(Config {
            archive_dir: None,
            participant: Some(Participant::human("Sam")),
        })
        .build()
        .unwrap();
    let path = planner
        .create_plan(&CreatePlan {
            code: "fb".to_string(),
            name: "Feedback".to_string(),
            base_path: temp_dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap()
        .path;

    let created = planner
        .create_feedback(
            &path,
            &CreateFeedback {
                title: "Looks good".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(created.record.participants, vec![Participant::human("Sam")]);

    let shown = planner.show_feedback(&path, &created.record.id).unwrap();
    assert_eq!(shown, created.record);

    let err = planner.show_feedback(&path, "999-nope").unwrap_err();
    assert!(matches!(err, PlanError::FeedbackNotFound { .. }));
}

#[test]
fn test_feedback_defaults_to_user_participant() {
    let (_temp_dir, planner, path) = create_test_planner();

    let created = planner
        .create_feedback(
            &path,
            &CreateFeedback {
                title: "Needs work".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(created.record.participants, vec![Participant::human("User")]);
}
