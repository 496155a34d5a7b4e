//! External build invocation.
//!
//! The build command is opaque to deckhand: a shell command configured per
//! repository. Its exit status and both output streams come back as data;
//! the orchestrator decides what a failure means (cleanup still runs).

use std::path::Path;

use serde::Serialize;

use crate::utils::command::{self, CapturedOutput};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    pub command: String,
    pub success: bool,
    pub exit_code: i32,
    #[serde(flatten)]
    pub output: CapturedOutput,
}

/// Run the configured build command through the shell, capturing output.
pub fn run_build(root: &Path, build_command: &str) -> BuildOutput {
    log_status!("build", "{}", build_command);

    let result = command::run_shell(build_command, Some(&root.to_string_lossy()));

    if result.success {
        log_status!("build", "Build succeeded");
    } else {
        log_status!("build", "Build failed with exit code {}", result.exit_code);
    }

    BuildOutput {
        command: build_command.to_string(),
        success: result.success,
        exit_code: result.exit_code,
        output: result.output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn successful_build_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let out = run_build(dir.path(), "echo compiled");
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.output.stdout.trim(), "compiled");
    }

    #[test]
    fn failed_build_keeps_both_streams() {
        let dir = TempDir::new().unwrap();
        let out = run_build(dir.path(), "echo progress; echo broken >&2; exit 1");
        assert!(!out.success);
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.output.stdout.trim(), "progress");
        assert_eq!(out.output.stderr.trim(), "broken");
    }

    #[test]
    fn build_runs_at_tree_root() {
        let dir = TempDir::new().unwrap();
        let out = run_build(dir.path(), "pwd");
        assert!(out.success);
        let reported = std::fs::canonicalize(out.output.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }
}
