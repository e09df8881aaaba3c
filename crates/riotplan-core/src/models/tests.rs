#[cfg(test)]
mod model_tests {
    use std::path::PathBuf;

    use jiff::Timestamp;

    use crate::{
        error::PlanError,
        models::{
            Blocker, Plan, PlanMetadata, PlanState, PlanStatus, Step, StepAction, StepStatus,
        },
        params::StatusUpdate,
    };

    fn ts(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    fn create_test_plan(steps: usize) -> Plan {
        Plan {
            path: PathBuf::from("/plans/test"),
            metadata: PlanMetadata {
                code: "test".to_string(),
                name: "Test Plan".to_string(),
                description: None,
            },
            state: PlanState::new(ts(1_640_995_200)), // 2022-01-01 00:00:00 UTC
            steps: (1..=steps)
                .map(|n| Step::new(n as u32, format!("Step {n}"), None))
                .collect(),
        }
    }

    fn step_in(status: StepStatus) -> Step {
        let mut step = Step::new(1, "Test Step", None);
        step.status = status;
        if status == StepStatus::Blocked {
            step.block_reason = Some("stuck".to_string());
        }
        step
    }

    #[test]
    fn test_transition_table() {
        use StepStatus::*;

        let all = [Pending, InProgress, Completed, Blocked, Skipped, Failed];
        let cases: [(StepAction, &[StepStatus], StepStatus); 5] = [
            (StepAction::Start, &[Pending, Blocked], InProgress),
            (
                StepAction::Complete { notes: None },
                &[InProgress, Pending],
                Completed,
            ),
            (
                StepAction::Block {
                    reason: "waiting".to_string(),
                },
                &[Pending, InProgress, Blocked, Failed],
                Blocked,
            ),
            (StepAction::Unblock, &[Blocked], Pending),
            (StepAction::Skip { reason: None }, &[Pending, Blocked], Skipped),
        ];

        for (action, allowed, target) in &cases {
            for from in all {
                let result = step_in(from).apply(action);
                if allowed.contains(&from) {
                    let step = result.unwrap_or_else(|e| {
                        panic!("{} from {from} should succeed: {e}", action.name())
                    });
                    assert_eq!(step.status, *target);
                } else {
                    match result {
                        Err(PlanError::InvalidTransition {
                            operation, status, ..
                        }) => {
                            assert_eq!(operation, action.name());
                            assert_eq!(status, from);
                        }
                        other => panic!("{} from {from} should fail, got {other:?}", action.name()),
                    }
                }
            }
        }
    }

    #[test]
    fn test_transition_side_effects() {
        let blocked = step_in(StepStatus::Blocked);
        assert_eq!(blocked.apply(&StepAction::Start).unwrap().block_reason, None);
        assert_eq!(blocked.apply(&StepAction::Unblock).unwrap().block_reason, None);

        let skipped = blocked
            .apply(&StepAction::Skip {
                reason: Some("out of scope".to_string()),
            })
            .unwrap();
        assert_eq!(skipped.block_reason, None);
        assert_eq!(skipped.notes.as_deref(), Some("out of scope"));

        let done = step_in(StepStatus::InProgress)
            .apply(&StepAction::Complete {
                notes: Some("all green".to_string()),
            })
            .unwrap();
        assert_eq!(done.notes.as_deref(), Some("all green"));

        let padded = step_in(StepStatus::Pending)
            .apply(&StepAction::Block {
                reason: "  waiting on CI \n".to_string(),
            })
            .unwrap();
        assert_eq!(padded.block_reason.as_deref(), Some("waiting on CI"));

        let err = step_in(StepStatus::Pending)
            .apply(&StepAction::Block {
                reason: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput { .. }));
    }

    #[test]
    fn test_completing_twice_fails_and_leaves_plan_unchanged() {
        let plan = create_test_plan(2);
        let plan = plan
            .apply_step_action_at(1, &StepAction::Complete { notes: None }, ts(10))
            .unwrap()
            .plan;

        let err = plan
            .apply_step_action_at(1, &StepAction::Complete { notes: None }, ts(20))
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidTransition {
                operation: "complete",
                step: 1,
                status: StepStatus::Completed,
            }
        ));
        assert_eq!(plan.state.last_updated_at, ts(10));
    }

    #[test]
    fn test_unknown_step_numbers() {
        let plan = create_test_plan(3);
        for number in [0, 4] {
            let err = plan.apply_step_action(number, &StepAction::Start).unwrap_err();
            assert!(matches!(err, PlanError::StepNotFound { number: n } if n == number));
        }
    }

    #[test]
    fn test_progress_tracks_completed_steps() {
        let mut plan = create_test_plan(3);
        assert_eq!(plan.state.progress, 0);

        for (number, expected) in [(1, 33), (2, 67), (3, 100)] {
            plan = plan
                .apply_step_action_at(number, &StepAction::Complete { notes: None }, ts(100))
                .unwrap()
                .plan;
            assert_eq!(plan.state.progress, expected);
        }
        assert_eq!(plan.state.status, PlanStatus::Completed);
        assert_eq!(plan.state.completed_at, Some(ts(100)));
    }

    #[test]
    fn test_current_step_resolution() {
        let plan = create_test_plan(3);
        let plan = plan
            .apply_step_action_at(2, &StepAction::Start, ts(1))
            .unwrap()
            .plan;
        assert_eq!(plan.state.current_step, Some(2));

        // Starting another step moves the pointer to it
        let plan = plan
            .apply_step_action_at(3, &StepAction::Start, ts(2))
            .unwrap()
            .plan;
        assert_eq!(plan.state.current_step, Some(3));

        // Finishing it falls back to the remaining in-progress step
        let plan = plan
            .apply_step_action_at(3, &StepAction::Complete { notes: None }, ts(3))
            .unwrap()
            .plan;
        assert_eq!(plan.state.current_step, Some(2));

        let plan = plan
            .apply_step_action_at(2, &StepAction::Complete { notes: None }, ts(4))
            .unwrap()
            .plan;
        assert_eq!(plan.state.current_step, None);
    }

    #[test]
    fn test_blockers_follow_blocked_steps() {
        let mut plan = create_test_plan(2);
        plan.state.blockers.push(Blocker {
            description: "Budget approval".to_string(),
            step: None,
            created_at: ts(5),
        });

        let blocked = plan
            .apply_step_action_at(
                1,
                &StepAction::Block {
                    reason: "waiting on API keys".to_string(),
                },
                ts(10),
            )
            .unwrap()
            .plan;
        assert_eq!(blocked.state.blockers.len(), 2);
        let step_blocker = &blocked.state.blockers[1];
        assert_eq!(step_blocker.step, Some(1));
        assert_eq!(step_blocker.description, "waiting on API keys");
        assert_eq!(step_blocker.created_at, ts(10));

        // Re-blocking keeps the original timestamp
        let reblocked = blocked
            .apply_step_action_at(
                1,
                &StepAction::Block {
                    reason: "still waiting".to_string(),
                },
                ts(20),
            )
            .unwrap()
            .plan;
        assert_eq!(reblocked.state.blockers[1].created_at, ts(10));
        assert_eq!(reblocked.state.blockers[1].description, "still waiting");

        let padded = reblocked
            .apply_step_action_at(
                2,
                &StepAction::Block {
                    reason: "  needs design review  ".to_string(),
                },
                ts(25),
            )
            .unwrap()
            .plan;
        assert_eq!(padded.state.blockers[2].description, "needs design review");
        assert_eq!(
            padded.steps[1].block_reason.as_deref(),
            Some("needs design review")
        );

        let unblocked = reblocked
            .apply_step_action_at(1, &StepAction::Unblock, ts(30))
            .unwrap()
            .plan;
        assert_eq!(unblocked.state.blockers.len(), 1);
        assert_eq!(unblocked.state.blockers[0].step, None);
    }

    #[test]
    fn test_update_status_rules() {
        let plan = create_test_plan(2);

        // Nothing touched: status stays as it was
        let same = plan.update_status_at(&StatusUpdate::default(), ts(50));
        assert_eq!(same.state.status, PlanStatus::NotStarted);
        assert_eq!(same.state.last_updated_at, ts(50));

        // Skipping every step completes the plan with zero progress
        let skipped = plan
            .update_status_at(
                &StatusUpdate {
                    step: Some(1),
                    step_status: Some(StepStatus::Skipped),
                },
                ts(60),
            )
            .update_status_at(
                &StatusUpdate {
                    step: Some(2),
                    step_status: Some(StepStatus::Skipped),
                },
                ts(70),
            );
        assert_eq!(skipped.state.status, PlanStatus::Completed);
        assert_eq!(skipped.state.progress, 0);
        assert_eq!(skipped.state.completed_at, Some(ts(70)));

        // Reopening a step reverts a completed plan
        let reopened = skipped.update_status_at(
            &StatusUpdate {
                step: Some(2),
                step_status: Some(StepStatus::Pending),
            },
            ts(80),
        );
        assert_eq!(reopened.state.status, PlanStatus::InProgress);
        assert_eq!(reopened.state.completed_at, None);

        // Unknown steps are ignored
        let ignored = plan.update_status_at(
            &StatusUpdate {
                step: Some(9),
                step_status: Some(StepStatus::Completed),
            },
            ts(90),
        );
        assert_eq!(ignored.steps, plan.steps);
    }

    #[test]
    fn test_empty_plan_never_completes() {
        let plan = create_test_plan(0);
        let updated = plan.update_status_at(&StatusUpdate::default(), ts(1));
        assert_eq!(updated.state.status, PlanStatus::NotStarted);
        assert_eq!(updated.state.progress, 0);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("In Progress".parse::<PlanStatus>(), Ok(PlanStatus::InProgress));
        assert_eq!("not-started".parse::<PlanStatus>(), Ok(PlanStatus::NotStarted));
        assert_eq!("COMPLETED".parse::<PlanStatus>(), Ok(PlanStatus::Completed));
        assert!("done".parse::<PlanStatus>().is_err());

        assert_eq!("in_progress".parse::<StepStatus>(), Ok(StepStatus::InProgress));
        assert_eq!("Skipped".parse::<StepStatus>(), Ok(StepStatus::Skipped));
        assert!("todo".parse::<StepStatus>().is_err());

        assert_eq!(PlanStatus::InProgress.with_icon(), "🔄 In Progress");
        assert_eq!(StepStatus::Blocked.with_icon(), "⏸️ blocked");
        assert!(StepStatus::Skipped.is_terminal());
        assert!(!StepStatus::Failed.is_terminal());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&StepStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&PlanStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
    }
}
