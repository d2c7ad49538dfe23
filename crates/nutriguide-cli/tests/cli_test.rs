//! End-to-end tests for the `nutriguide` binary.
//!
//! Each test gets its own config and data directories so nothing touches the
//! real home directory. None of these commands reach the generation service.

use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

use tempfile::TempDir;

use nutriguide_store::{FileStore, Slots};
use nutriguide_test_utils::fixtures;

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

struct Sandbox {
    home: TempDir,
    data: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            data: TempDir::new().unwrap(),
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_nutriguide"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("NUTRIGUIDE_DATA_DIR", self.data.path())
            .env_remove("GEMINI_API_KEY")
            .env_remove("NUTRIGUIDE_MODEL")
            .env("RUST_LOG", "warn")
            .output()
            .expect("failed to run nutriguide")
    }

    fn slots(&self) -> Slots {
        Slots::new(Arc::new(FileStore::open_dir(self.data.path()).unwrap()))
    }

    /// Store the sample profile, plan and guidelines.
    fn seed(&self) {
        let slots = self.slots();
        slots.save_profile(&fixtures::sample_profile()).unwrap();
        slots.save_meal_plan(&fixtures::sample_meal_plan()).unwrap();
        slots.save_guidelines(&fixtures::sample_guidelines()).unwrap();
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn slot_file(dir: &Path, key: &str) -> std::path::PathBuf {
    dir.join(format!("{key}.json"))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[test]
fn completions_are_printed() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["completions", "bash"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("nutriguide"));
}

#[test]
fn status_without_profile_suggests_onboarding() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["status"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Profile: none"), "stdout: {text}");
    assert!(text.contains("API key: missing"), "stdout: {text}");
    assert!(text.contains("nutriguide onboard"));
}

#[test]
fn status_reports_seeded_data() {
    let sandbox = Sandbox::new();
    sandbox.seed();
    let out = sandbox.run(&["status"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Profile: Alex"), "stdout: {text}");
    assert!(text.contains("Meal plan: 3 days"), "stdout: {text}");
    assert!(text.contains("Check-ins: none"), "stdout: {text}");
}

#[test]
fn log_without_profile_fails() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["log", "--weight", "70"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no profile found"), "stderr: {}", stderr(&out));
}

#[test]
fn log_then_history() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let out = sandbox.run(&[
        "log", "--weight", "72.5", "--mood", "4", "--adherence", "90", "--date", "03/04/2025",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Logged 03/04/2025: 72.5 kg"), "stdout: {}", stdout(&out));

    let out = sandbox.run(&["history"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("03/04/2025"), "stdout: {text}");
    assert!(text.contains("72.5"), "stdout: {text}");

    let history = sandbox.slots().load_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].adherence, 90);
}

#[test]
fn unusable_weight_records_nothing() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let out = sandbox.run(&["log", "--weight", "abc"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("No entry recorded"));

    let out = sandbox.run(&["history", "--json"]);
    assert_eq!(stdout(&out).trim(), "[]");
}

#[test]
fn bad_date_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.seed();
    let out = sandbox.run(&["log", "--weight", "70", "--date", "2025-03-04"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("MM/DD/YYYY"));
}

#[test]
fn plan_shows_one_day() {
    let sandbox = Sandbox::new();
    sandbox.seed();

    let out = sandbox.run(&["plan", "--day", "1"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Greek Yogurt"), "stdout: {text}");
    assert!(text.contains("+2 more"), "stdout: {text}");

    let out = sandbox.run(&["plan", "--day", "9"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("day 9 not found"));
}

#[test]
fn generate_without_api_key_explains_setup() {
    let sandbox = Sandbox::new();
    sandbox.seed();
    let out = sandbox.run(&["generate"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("GEMINI_API_KEY"), "stderr: {}", stderr(&out));
}

#[test]
fn reset_needs_confirmation() {
    let sandbox = Sandbox::new();
    sandbox.seed();
    let profile = slot_file(sandbox.data.path(), "nutriguide_user");
    let foreign = sandbox.data.path().join("package.json");
    std::fs::write(&foreign, "{}").unwrap();
    assert!(profile.exists());

    let out = sandbox.run(&["reset"]);
    assert!(!out.status.success());
    assert!(profile.exists());

    let out = sandbox.run(&["reset", "--yes"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!profile.exists());
    assert!(foreign.exists());
    assert!(stdout(&sandbox.run(&["status"])).contains("Profile: none"));
}

#[test]
fn corrupt_slot_is_reported_by_name() {
    let sandbox = Sandbox::new();
    std::fs::write(slot_file(sandbox.data.path(), "nutriguide_meals"), "{not json").unwrap();

    let out = sandbox.run(&["status"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("nutriguide_meals"), "stderr: {}", stderr(&out));
}

#[test]
fn init_writes_private_config() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["init", "--api-key", "abcd1234wxyz"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("abcd...wxyz"));

    let out = sandbox.run(&["init", "--api-key", "other"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("--force"));

    let out = sandbox.run(&["status"]);
    assert!(stdout(&out).contains("API key: configured"));
}
