use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch directory with an empty config file, so the user's own
/// configuration never leaks into a test.
struct TestEnv {
    dir: TempDir,
    config: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let config = dir.path().join("config.json");
        fs::write(&config, "{}").expect("Failed to write config");
        Self { dir, config }
    }

    /// Command with --no-color and the scratch config applied.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("riotplan").expect("Failed to find riotplan binary");
        cmd.arg("--no-color").arg("--config").arg(&self.config);
        cmd
    }

    fn plan_path(&self, code: &str) -> PathBuf {
        self.dir.path().join(code)
    }

    /// Runs `plan init` and returns the plan directory.
    fn init(&self, code: &str) -> PathBuf {
        self.cmd()
            .args(["plan", "init", code, "--path"])
            .arg(self.dir.path())
            .assert()
            .success();
        self.plan_path(code)
    }
}

#[test]
fn test_cli_init_plan() {
    let env = TestEnv::new();

    env.cmd()
        .args(["plan", "init", "big-feature", "-d", "Ship the big feature", "-p"])
        .arg(env.dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created plan 'big-feature'"))
        .stdout(predicate::str::contains("# Big Feature (big-feature)"))
        .stdout(predicate::str::contains("### 03. Testing"))
        .stdout(predicate::str::contains("Documentation").not());

    let plan = env.plan_path("big-feature");
    assert!(plan.join("STATUS.md").is_file());
    assert!(plan.join("plan/01-setup.md").is_file());
    assert!(plan.join("plan/03-testing.md").is_file());
}

#[test]
fn test_cli_init_rejects_bad_code() {
    let env = TestEnv::new();

    env.cmd()
        .args(["plan", "init", "Bad_Code", "--path"])
        .arg(env.dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [INVALID_CODE]"));
}

#[test]
fn test_cli_init_twice_fails() {
    let env = TestEnv::new();
    env.init("demo");

    env.cmd()
        .args(["plan", "init", "demo", "--path"])
        .arg(env.dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [PLAN_ALREADY_EXISTS]"));
}

#[test]
fn test_cli_status_views() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .arg("status")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Demo (demo)"))
        .stdout(predicate::str::contains("- **Progress**: 0% (0/3 steps)"))
        .stdout(predicate::str::contains("## Steps").not());

    env.cmd()
        .args(["status", "show", "--verbose"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Steps"))
        .stdout(predicate::str::contains("### 02. Implementation"));

    env.cmd()
        .args(["status", "--json"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": \"demo\""))
        .stdout(predicate::str::contains("\"status\": \"not_started\""));
}

#[test]
fn test_cli_status_missing_plan() {
    let env = TestEnv::new();

    env.cmd()
        .arg("status")
        .arg(env.plan_path("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [PLAN_NOT_FOUND]"));
}

#[test]
fn test_cli_step_transitions_persist() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .args(["step", "start", "1"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated step 01: Setup"))
        .stdout(predicate::str::contains("Status: pending → in_progress"));

    env.cmd()
        .args(["step", "complete", "1"])
        .arg(&plan)
        .args(["--notes", "toolchain installed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notes: toolchain installed"))
        .stdout(predicate::str::contains("- **Progress**: 33% (1/3 steps)"));

    env.cmd()
        .args(["step", "block", "2", "waiting on review"])
        .arg(&plan)
        .assert()
        .success();

    env.cmd()
        .args(["step", "list", "--completed"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("### 01. Setup"))
        .stdout(predicate::str::contains("Implementation").not());

    let status = fs::read_to_string(plan.join("STATUS.md")).unwrap();
    assert!(status.contains("waiting on review"));

    // Completing twice is an invalid transition
    env.cmd()
        .args(["step", "complete", "1"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [INVALID_TRANSITION]"));

    env.cmd()
        .args(["step", "start", "9"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [STEP_NOT_FOUND]"));
}

#[test]
fn test_cli_add_and_remove_steps() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .args(["step", "add", "Design"])
        .arg(&plan)
        .args(["--after", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted step 02: Design"))
        .stdout(predicate::str::contains("02-implementation.md → 03-implementation.md"));
    assert!(plan.join("plan/02-design.md").is_file());
    assert!(plan.join("plan/04-testing.md").is_file());

    // Without --force nothing is removed
    env.cmd()
        .args(["step", "remove", "2"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Will remove step 02: Design"));
    assert!(plan.join("plan/02-design.md").is_file());

    env.cmd()
        .args(["step", "remove", "2", "--force"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed step 02: Design"));
    assert!(!plan.join("plan/02-design.md").exists());
    assert!(plan.join("plan/02-implementation.md").is_file());
    assert!(plan.join("plan/03-testing.md").is_file());
}

#[test]
fn test_cli_add_step_bad_position() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .args(["step", "add", "Too far", "--position", "9"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [INVALID_POSITION]"));
}

#[test]
fn test_cli_validate() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .args(["plan", "validate"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Plan is valid"));

    env.cmd()
        .args(["plan", "validate", "--json"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));

    // Missing step files are warnings, which only fail under --strict
    fs::remove_file(plan.join("plan/02-implementation.md")).unwrap();
    env.cmd()
        .args(["plan", "validate"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("MISSING_STEP_FILE"));

    env.cmd()
        .args(["plan", "validate", "--strict"])
        .arg(&plan)
        .assert()
        .failure()
        .stdout(predicate::str::contains("❌ Plan is invalid"));
}

#[test]
fn test_cli_archive() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .args(["plan", "archive"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [PLAN_NOT_COMPLETED]"));
    assert!(plan.is_dir());

    let target = env.dir.path().join("done");
    env.cmd()
        .args(["plan", "archive", "--mark-complete", "--target"])
        .arg(&target)
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived plan 'demo'"));

    assert!(!plan.exists());
    let archived = fs::read_to_string(target.join("demo/STATUS.md")).unwrap();
    assert!(archived.contains("Completed"));
}

#[test]
fn test_cli_feedback() {
    let env = TestEnv::new();
    let plan = env.init("demo");

    env.cmd()
        .args(["feedback", "create", "Looks good"])
        .arg(&plan)
        .args(["--step", "2", "--platform", "github", "--summary", "Ship it."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded feedback 001-looks-good"));

    env.cmd()
        .args(["feedback", "list"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Looks good (001-looks-good)"));

    env.cmd()
        .args(["feedback", "show", "001-looks-good", "--json"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"platform\": \"github\""))
        .stdout(predicate::str::contains("\"name\": \"User\""));

    env.cmd()
        .args(["feedback", "show", "404-missing"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [FEEDBACK_NOT_FOUND]"));
}

#[test]
fn test_cli_missing_config_file() {
    let env = TestEnv::new();

    Command::cargo_bin("riotplan")
        .expect("Failed to find riotplan binary")
        .args(["--no-color", "--config"])
        .arg(env.dir.path().join("absent.json"))
        .arg("status")
        .arg(env.dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [CONFIGURATION]"));
}
