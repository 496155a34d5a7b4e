//! Command execution primitives with consistent error handling.
//!
//! External commands never surface as panics or exceptions-as-control-flow:
//! expected non-zero exits come back as data (`CommandOutput`), and only
//! spawn-level problems are folded into the same structure.

use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{Error, Result};

/// Run a command and return stdout on success.
///
/// Returns trimmed stdout if the command succeeds.
/// Returns an error with stderr (or stdout fallback) if it fails.
pub fn run_in(dir: &str, program: &str, args: &[&str], context: &str) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", context, e),
                Some(context.to_string()),
            )
        })?;

    if !output.status.success() {
        return Err(Error::internal_io(
            format!("{} failed: {}", context, error_text(&output)),
            Some(context.to_string()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

/// Captured output from command execution.
/// Reusable primitive for any command that executes external processes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }
}

/// Full structured result of a shell command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    #[serde(flatten)]
    pub output: CapturedOutput,
}

/// Execute a shell command through `sh -c`, capturing both streams.
///
/// Shell execution is required because build commands chain subcommands
/// with `&&`, `;`, pipes and environment expansion. A spawn failure is
/// reported through the same structure, never as a panic.
pub fn run_shell(command: &str, current_dir: Option<&str>) -> CommandOutput {
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    };

    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }

    match cmd.output() {
        Ok(out) => CommandOutput {
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
            output: CapturedOutput::new(
                String::from_utf8_lossy(&out.stdout).to_string(),
                String::from_utf8_lossy(&out.stderr).to_string(),
            ),
        },
        Err(e) => CommandOutput {
            success: false,
            exit_code: -1,
            output: CapturedOutput::new(String::new(), format!("Command error: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_in_succeeds_with_valid_command() {
        let result = run_in("/tmp", "echo", &["hello"], "echo test");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "hello");
    }

    #[test]
    fn run_in_fails_with_invalid_command() {
        let result = run_in("/tmp", "nonexistent_command_xyz", &[], "test");
        assert!(result.is_err());
    }

    #[test]
    fn run_shell_captures_stdout() {
        let out = run_shell("echo shell-out", None);
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.output.stdout.trim(), "shell-out");
    }

    #[test]
    fn run_shell_reports_exit_code_as_data() {
        let out = run_shell("echo oops >&2; exit 3", None);
        assert!(!out.success);
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.output.stderr.trim(), "oops");
    }

    #[test]
    fn run_shell_runs_in_requested_dir() {
        let out = run_shell("pwd", Some("/tmp"));
        assert!(out.success);
        assert!(out.output.stdout.trim().ends_with("tmp"));
    }

    #[test]
    fn error_text_prefers_stderr() {
        let output = Output {
            status: std::process::ExitStatus::default(),
            stdout: b"stdout content".to_vec(),
            stderr: b"stderr content".to_vec(),
        };
        assert_eq!(error_text(&output), "stderr content");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let output = Output {
            status: std::process::ExitStatus::default(),
            stdout: b"stdout content".to_vec(),
            stderr: b"".to_vec(),
        };
        assert_eq!(error_text(&output), "stdout content");
    }
}
