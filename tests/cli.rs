#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create tempdir"),
        }
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").expect("binary");
        cmd.env("TASKBOARD_HOME", self.dir.path())
            .env_remove("TASKBOARD_STORE")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).output().expect("run");
        assert!(
            output.status.success(),
            "command {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf8 stdout")
    }

    fn stored(&self) -> Vec<Value> {
        let out = self.run(&["list", "--json"]);
        serde_json::from_str(&out).unwrap_or_else(|e| panic!("parse JSON failed: {e}\n{out}"))
    }
}

// ─── scenarios ─────────────────────────────────────────────────────

#[test]
fn add_drop_delete_round_trip() {
    let env = TestEnv::new();
    assert!(env.stored().is_empty());

    let id = env.run(&["add", "--title", "A"]).trim().to_string();
    let tasks = env.stored();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id.as_str());
    assert_eq!(tasks[0]["title"], "A");
    assert_eq!(tasks[0]["description"], "");
    assert_eq!(tasks[0]["dueDate"], "");
    assert_eq!(tasks[0]["status"], "to-do");

    env.run(&["move", &id, "done"]);
    let tasks = env.stored();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["status"], "done");

    env.run(&["delete", &id]);
    assert!(env.stored().is_empty());
}

#[test]
fn storage_file_lives_in_home() {
    let env = TestEnv::new();
    env.run(&["add", "--title", "Persist me"]);
    let raw = fs::read_to_string(env.dir.path().join("tasks.json")).expect("slot file");
    assert!(raw.contains("Persist me"));
    assert!(env.dir.path().join("taskboard.log").exists());
}

#[test]
fn corrupt_storage_reads_as_empty() {
    let env = TestEnv::new();
    fs::write(env.dir.path().join("tasks.json"), "{{ definitely not json").unwrap();
    env.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To Do (0)"));
}

#[test]
fn unknown_lane_fails_and_leaves_task_alone() {
    let env = TestEnv::new();
    let id = env.run(&["add", "--title", "A"]).trim().to_string();
    env.cmd()
        .args(["move", &id, "archive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown lane"));
    assert_eq!(env.stored()[0]["status"], "to-do");
}

#[test]
fn deleting_missing_id_is_silent() {
    let env = TestEnv::new();
    env.run(&["add", "--title", "keep"]);
    env.cmd().args(["delete", "no-such-id"]).assert().success();
    assert_eq!(env.stored().len(), 1);
}

#[test]
fn explicit_store_flag_wins() {
    let env = TestEnv::new();
    let custom = env.dir.path().join("elsewhere").join("board.json");
    let custom_arg = custom.to_str().unwrap();
    env.run(&["--store", custom_arg, "add", "--title", "X"]);
    assert!(custom.exists());
    assert!(!env.dir.path().join("tasks.json").exists());
}

#[test]
fn config_store_path_is_used() {
    let env = TestEnv::new();
    let custom = env.dir.path().join("from-config.json");
    fs::write(
        env.dir.path().join("config.toml"),
        format!("store_path = {:?}\n", custom.to_str().unwrap()),
    )
    .unwrap();
    env.run(&["add", "--title", "Y"]);
    assert!(custom.exists());
}
