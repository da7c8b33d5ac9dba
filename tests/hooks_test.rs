use std::io::{self, Write};
use std::path::Path;

use visionbake::context::{GenerationContext, HookPayload};
use visionbake::error::{Error, Result};
use visionbake::hooks::{post_gen, pre_gen};
use visionbake::prompt::Prompter;
use tempfile::TempDir;

/// Prompter stub with canned answers.
struct ScriptedPrompter {
    confirm_answer: bool,
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(self.confirm_answer)
    }

    fn wait_for_enter(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

fn payload_with(output_dir: &Path, entries: &[(&str, &str)]) -> HookPayload {
    let mut context = GenerationContext::new();
    for (key, value) in entries {
        context.insert((*key).to_string(), serde_json::json!(value));
    }
    let json = serde_json::json!({
        "template_dir": "/tmp/template",
        "output_dir": output_dir,
        "context": context,
    });
    HookPayload::from_reader(json.to_string().as_bytes()).unwrap()
}

fn write_mlflow_assets(output_dir: &Path) {
    std::fs::create_dir_all(output_dir.join("mlflow")).unwrap();
    std::fs::write(output_dir.join("mlflow/config.yaml"), "tracking: local").unwrap();
    std::fs::create_dir_all(output_dir.join("docs")).unwrap();
    std::fs::write(output_dir.join("docs/mlflow.md"), "# MLflow").unwrap();
}

/// Writer that fails like a closed pipe on every write.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_pre_gen_banner_writes_logo_and_welcome() {
    let temp_dir = TempDir::new().unwrap();
    let payload = payload_with(temp_dir.path(), &[]);

    let mut out = Vec::new();
    pre_gen::run(&mut out, &payload, &ScriptedPrompter { confirm_answer: true }).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Computer Vision Template"));
    assert!(text.contains("Let's get started!"));
}

#[test]
fn test_pre_gen_closed_stdout_is_an_error_not_a_panic() {
    let temp_dir = TempDir::new().unwrap();
    let payload = payload_with(temp_dir.path(), &[]);

    let result = pre_gen::run(&mut ClosedPipe, &payload, &ScriptedPrompter { confirm_answer: true });

    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_payload_from_reader() {
    let temp_dir = TempDir::new().unwrap();
    let payload = payload_with(
        temp_dir.path(),
        &[("enable_mlflow_tracking", "y"), ("install_dependencies", "No")],
    );

    assert_eq!(payload.output_dir, temp_dir.path());
    assert!(payload.flag("enable_mlflow_tracking"));
    assert!(!payload.flag("install_dependencies"));
    assert!(!payload.flag("unknown_flag"));
}

#[test]
fn test_payload_rejects_garbage() {
    assert!(HookPayload::from_reader("not json".as_bytes()).is_err());
}

#[test]
fn test_mlflow_assets_removed_when_flag_negative() {
    let temp_dir = TempDir::new().unwrap();
    write_mlflow_assets(temp_dir.path());

    post_gen::remove_mlflow_assets(temp_dir.path());

    assert!(!temp_dir.path().join("mlflow").exists());
    assert!(!temp_dir.path().join("docs/mlflow.md").exists());
    assert!(temp_dir.path().join("docs").exists());
}

#[test]
fn test_remove_mlflow_assets_is_best_effort() {
    let temp_dir = TempDir::new().unwrap();
    // Nothing to remove must not panic or error.
    post_gen::remove_mlflow_assets(temp_dir.path());
}

#[test]
fn test_mlflow_assets_kept_when_flag_affirmative() {
    let temp_dir = TempDir::new().unwrap();
    write_mlflow_assets(temp_dir.path());

    let payload = payload_with(temp_dir.path(), &[("enable_mlflow_tracking", "y")]);
    post_gen::run(&payload, &ScriptedPrompter { confirm_answer: true }).unwrap();

    assert!(temp_dir.path().join("mlflow").exists());
    assert!(temp_dir.path().join("docs/mlflow.md").exists());
}

#[test]
fn test_run_removes_assets_and_inits_repository() {
    let temp_dir = TempDir::new().unwrap();
    write_mlflow_assets(temp_dir.path());

    let payload = payload_with(temp_dir.path(), &[("enable_mlflow_tracking", "n")]);
    post_gen::run(&payload, &ScriptedPrompter { confirm_answer: true }).unwrap();

    assert!(!temp_dir.path().join("mlflow").exists());
    assert!(temp_dir.path().join(".git").exists());
}

#[test]
fn test_init_git_repo_skips_existing() {
    let temp_dir = TempDir::new().unwrap();

    assert!(post_gen::init_git_repo(temp_dir.path()).unwrap());
    assert!(!post_gen::init_git_repo(temp_dir.path()).unwrap());
}

#[test]
fn test_decline_aborts_without_side_effects() {
    let temp_dir = TempDir::new().unwrap();
    write_mlflow_assets(temp_dir.path());

    let payload = payload_with(
        temp_dir.path(),
        &[("confirm_configuration", "y"), ("enable_mlflow_tracking", "n")],
    );
    let result = post_gen::run(&payload, &ScriptedPrompter { confirm_answer: false });

    assert!(matches!(result, Err(Error::Declined)));
    // Declining must leave the tree untouched.
    assert!(temp_dir.path().join("mlflow").exists());
    assert!(temp_dir.path().join("docs/mlflow.md").exists());
    assert!(!temp_dir.path().join(".git").exists());
}
