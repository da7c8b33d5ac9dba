//! Pre-generation hook: welcome banner, logo and a single "press Enter"
//! gate. Purely cosmetic; a display failure must never block generation, so
//! the binary downgrades every error to a warning and exits with success.

use crate::context::HookPayload;
use crate::error::Result;
use crate::prompt::Prompter;
use std::io::Write;
use std::path::Path;

/// Compiled-in fallback used when the template ships no `hooks/logo.txt`.
const DEFAULT_LOGO: &str = r#"
╔═══════════════════════════════════════════════════════╗
║                                                       ║
║              Computer Vision Template                 ║
║          training · inference · deployment            ║
║                                                       ║
╚═══════════════════════════════════════════════════════╝
"#;

const WELCOME: &str = r#"
Welcome to the computer vision project template!

This template scaffolds a production-ready starter project:

  - training and inference pipeline with checkpoint helpers
  - HTTP inference service (health check + image prediction)
  - model export script
  - MLflow experiment tracking (optional)

Tips:
  - defaults are sensible for most use cases
  - every setting can be changed later in the generated project
  - on ARM machines, answer 'n' to use_cuda_default

Let's get started!
"#;

/// Returns the logo text: `hooks/logo.txt` under the template directory when
/// present and readable, otherwise the compiled-in default.
pub fn logo_text(template_dir: &Path) -> String {
    let logo_file = template_dir.join("hooks").join("logo.txt");
    match std::fs::read_to_string(&logo_file) {
        Ok(contents) => contents,
        Err(_) => DEFAULT_LOGO.to_string(),
    }
}

/// Runs the pre-generation hook: logo, welcome text, Enter gate. Output
/// goes through `out` so a closed stdout surfaces as an `Err` for the
/// binary to downgrade instead of a panic.
pub fn run<W: Write>(out: &mut W, payload: &HookPayload, prompter: &dyn Prompter) -> Result<()> {
    writeln!(out, "{}", logo_text(&payload.template_dir))?;
    writeln!(out, "{}", WELCOME)?;
    prompter.wait_for_enter("Press Enter to continue with project setup")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logo_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(logo_text(temp_dir.path()), DEFAULT_LOGO);
    }

    #[test]
    fn test_logo_prefers_template_file() {
        let temp_dir = TempDir::new().unwrap();
        let hooks_dir = temp_dir.path().join("hooks");
        std::fs::create_dir_all(&hooks_dir).unwrap();
        std::fs::write(hooks_dir.join("logo.txt"), "custom logo").unwrap();

        assert_eq!(logo_text(temp_dir.path()), "custom logo");
    }
}
