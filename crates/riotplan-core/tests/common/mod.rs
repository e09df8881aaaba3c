#![allow(dead_code)]

use std::path::{Path, PathBuf};

use riotplan_core::{
    params::{CreatePlan, StepSpec},
    Config, Planner, PlannerBuilder,
};
use tempfile::TempDir;

/// Helper function to create a planner that ignores any user config
pub fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = PlannerBuilder::new()
        .with_config(Config::default())
        .build()
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Creates a plan named after `code` with the given step titles
pub fn create_plan(planner: &Planner, base: &Path, code: &str, steps: &[&str]) -> PathBuf {
    planner
        .create_plan(&CreatePlan {
            code: code.to_string(),
            name: format!("Plan {code}"),
            base_path: base.to_path_buf(),
            description: None,
            steps: steps.iter().map(|t| StepSpec::new(*t)).collect(),
        })
        .expect("Failed to create plan")
        .path
}

/// Names of the step files in a plan, sorted
pub fn step_files(plan_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(plan_dir.join("plan"))
        .expect("Failed to read steps dir")
        .map(|e| {
            e.expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
