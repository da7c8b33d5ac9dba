//! Post-generation hook: finalizes the generated project tree.
//!
//! The confirmation step runs before anything else so that declining performs
//! no filesystem or network side effects. Every later step is best effort:
//! removal errors are suppressed and failed external commands degrade to a
//! printed warning with a manual-recovery suggestion.

use crate::context::{grouped_settings, HookPayload, FLAG_CONFIRM, FLAG_INSTALL_DEPS, FLAG_MLFLOW, FLAG_USE_CUDA};
use crate::error::{Error, Result};
use crate::hooks::{run_command, CommandOutcome};
use crate::prompt::Prompter;
use std::path::Path;

/// Directory holding the optional MLflow assets inside a generated project.
pub const MLFLOW_DIR: &str = "mlflow";
/// Optional MLflow document inside a generated project.
pub const MLFLOW_DOC: &str = "docs/mlflow.md";

/// Runs the post-generation hook end to end.
///
/// # Errors
/// * `Error::Declined` when the user rejects the configuration summary;
///   nothing has been touched at that point. All other steps only warn.
pub fn run(payload: &HookPayload, prompter: &dyn Prompter) -> Result<()> {
    if payload.flag(FLAG_CONFIRM) {
        confirm_configuration(payload, prompter)?;
    }

    if !payload.flag(FLAG_MLFLOW) {
        remove_mlflow_assets(&payload.output_dir);
    }

    if let Err(e) = init_git_repo(&payload.output_dir) {
        log::warn!("Unable to initialize a git repository: {}. Run 'git init' manually.", e);
    }

    warn_cuda_on_arm(payload.flag(FLAG_USE_CUDA));

    if payload.flag(FLAG_INSTALL_DEPS) {
        install_dependencies(&payload.output_dir);
    } else {
        println!("Skipping automatic dependency install (per template prompt).");
    }

    print_summary();
    Ok(())
}

/// Displays every substituted configuration value grouped by category and
/// asks for a final yes/no confirmation.
pub fn confirm_configuration(
    payload: &HookPayload,
    prompter: &dyn Prompter,
) -> Result<()> {
    println!("\nConfiguration summary");
    println!("=====================");
    for (category, entries) in grouped_settings(&payload.context) {
        println!("\n{}", category.title());
        for (key, value) in entries {
            println!("  {:<24} {}", key, value);
        }
    }
    println!();

    if prompter.confirm("Generate the project with these settings?")? {
        Ok(())
    } else {
        Err(Error::Declined)
    }
}

/// Best-effort removal of the optional MLflow directory and document.
pub fn remove_mlflow_assets(output_dir: &Path) {
    let mlflow_dir = output_dir.join(MLFLOW_DIR);
    if let Err(e) = std::fs::remove_dir_all(&mlflow_dir) {
        log::debug!("Did not remove '{}': {}", mlflow_dir.display(), e);
    }

    let mlflow_doc = output_dir.join(MLFLOW_DOC);
    if mlflow_doc.exists() {
        if let Err(e) = std::fs::remove_file(&mlflow_doc) {
            log::debug!("Did not remove '{}': {}", mlflow_doc.display(), e);
        }
    }
}

/// Initializes a git repository in the output directory unless one exists.
///
/// # Returns
/// * `Ok(true)` when a new repository was created
/// * `Ok(false)` when a repository marker is already present
pub fn init_git_repo(output_dir: &Path) -> Result<bool> {
    if output_dir.join(".git").exists() {
        log::debug!("Repository already initialized in {}", output_dir.display());
        return Ok(false);
    }
    git2::Repository::init(output_dir).map_err(Error::GitError)?;
    println!("Initialized empty git repository in {}", output_dir.display());
    Ok(true)
}

/// Prints the CUDA-on-ARM advisory when the flag is set on an aarch64 target.
pub fn warn_cuda_on_arm(use_cuda: bool) {
    if use_cuda && std::env::consts::ARCH == "aarch64" {
        log::warn!(
            "CUDA base images rarely run natively on ARM machines. \
             Use docker/Dockerfile.cpu or build with --platform=linux/amd64."
        );
    }
}

/// Invokes the dependency sync and the pre-commit hook install, each best
/// effort with a manual-recovery suggestion on failure.
pub fn install_dependencies(output_dir: &Path) {
    if let CommandOutcome::Failed(reason) =
        run_command("uv", &["sync", "--all-extras"], output_dir)
    {
        log::warn!("uv sync failed: {}. Install dependencies manually with 'uv sync'.", reason);
        return;
    }

    if let CommandOutcome::Failed(reason) =
        run_command("uv", &["run", "pre-commit", "install"], output_dir)
    {
        log::warn!(
            "pre-commit install failed: {}. Run 'uv run pre-commit install' manually.",
            reason
        );
    }
}

fn print_summary() {
    println!(
        "\nNext steps:\n\
         \x20 1. Review README.md for environment & Docker instructions.\n\
         \x20 2. Configure remotes via docs/remote_repo.md.\n\
         \x20 3. Update configs/training.yaml with your datasets.\n"
    );
}
