//! Thin wrappers over the system `git` used by the release workflow.

use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::command;

/// Resolve the current HEAD commit hash.
pub fn head_sha(root: &Path) -> Result<String> {
    command::run_in(
        &root.to_string_lossy(),
        "git",
        &["rev-parse", "HEAD"],
        "git rev-parse HEAD",
    )
    .map_err(|e| Error::vcs_query_failed("git rev-parse HEAD", e.to_string()))
}

/// Discard uncommitted modifications to a single tracked file.
///
/// Guards against a prior failed run leaving the manifest dirty; the file
/// must be tracked for this to succeed.
pub fn checkout_file(root: &Path, relative_path: &str) -> Result<()> {
    command::run_in(
        &root.to_string_lossy(),
        "git",
        &["checkout", "--", relative_path],
        "git checkout",
    )
    .map_err(|e| {
        Error::vcs_query_failed(
            format!("git checkout -- {}", relative_path),
            e.to_string(),
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn init_repo(dir: &Path) {
        for args in [
            vec!["init", "-q"],
            vec!["config", "user.email", "dev@example.com"],
            vec!["config", "user.name", "dev"],
        ] {
            let status = Command::new("git")
                .args(&args)
                .current_dir(dir)
                .status()
                .unwrap();
            assert!(status.success(), "git {:?} failed", args);
        }
    }

    fn commit_all(dir: &Path) {
        for args in [vec!["add", "."], vec!["commit", "-q", "-m", "init"]] {
            let status = Command::new("git")
                .args(&args)
                .current_dir(dir)
                .status()
                .unwrap();
            assert!(status.success(), "git {:?} failed", args);
        }
    }

    #[test]
    fn head_sha_returns_forty_hex_chars() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("file.txt"), "content").unwrap();
        commit_all(dir.path());

        let sha = head_sha(dir.path()).unwrap();
        assert_eq!(sha.len(), 40);
        assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn head_sha_fails_outside_a_repo() {
        let dir = TempDir::new().unwrap();
        let err = head_sha(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "vcs.query_failed");
    }

    #[test]
    fn checkout_file_discards_local_edit() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let file = dir.path().join("plugin.xml");
        fs::write(&file, "<version>1.0</version>").unwrap();
        commit_all(dir.path());

        fs::write(&file, "<version>dirty</version>").unwrap();
        checkout_file(dir.path(), "plugin.xml").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "<version>1.0</version>");
    }
}
