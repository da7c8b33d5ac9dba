//! Pre and post generation hook logic.
//! The hook binaries are invoked by the template renderer with the generation
//! payload piped to stdin; everything in here is sequential glue that must
//! never block or break project generation.

pub mod post_gen;
pub mod pre_gen;

use std::path::Path;
use std::process::Command;

/// Outcome of a best-effort external command invocation.
///
/// Spawn failures and non-zero exit codes are folded into `Failed` so callers
/// can log the reason and move on instead of propagating an error.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    Failed(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Completed)
    }
}

/// Runs an external command in `cwd`, inheriting stdout/stderr.
pub fn run_command(program: &str, args: &[&str], cwd: &Path) -> CommandOutcome {
    log::debug!("Running '{} {}' in {}", program, args.join(" "), cwd.display());

    match Command::new(program).args(args).current_dir(cwd).status() {
        Ok(status) if status.success() => CommandOutcome::Completed,
        Ok(status) => {
            CommandOutcome::Failed(format!("'{}' exited with {}", program, status))
        }
        Err(e) => CommandOutcome::Failed(format!("could not run '{}': {}", program, e)),
    }
}
