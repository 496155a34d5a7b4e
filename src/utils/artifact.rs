//! Build artifact path resolution with glob pattern support.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve a potentially glob-patterned artifact path to an actual file.
///
/// - If the path contains no glob chars (`*`, `?`, `[`, `]`), it is returned
///   unchanged after an existence check
/// - If the path is a glob, the most recently modified match wins
/// - Returns an error if nothing matches or the path doesn't exist
pub fn resolve_artifact_path(root: &Path, pattern: &str) -> Result<PathBuf> {
    let full = root.join(pattern);
    let full_str = full.to_string_lossy();

    if !contains_glob_chars(pattern) {
        if full.is_file() {
            return Ok(full);
        }
        return Err(Error::package_failed(format!(
            "Build artifact not found: {}",
            full_str
        )));
    }

    let entries: Vec<PathBuf> = glob::glob(&full_str)
        .map_err(|e| {
            Error::config_invalid_value(
                "buildArtifact",
                Some(pattern.to_string()),
                format!("Invalid glob pattern: {}", e),
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    let newest = entries
        .into_iter()
        .max_by_key(|p| p.metadata().and_then(|m| m.modified()).ok());

    match newest {
        Some(path) => {
            log_status!("release", "Resolved '{}' -> '{}'", pattern, path.display());
            Ok(path)
        }
        None => Err(Error::package_failed(format!(
            "No files match artifact pattern: {}",
            full_str
        ))),
    }
}

fn contains_glob_chars(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[') || s.contains(']')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn literal_path_exists() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("plugin.jar")).unwrap();

        let result = resolve_artifact_path(dir.path(), "plugin.jar");
        assert_eq!(result.unwrap(), dir.path().join("plugin.jar"));
    }

    #[test]
    fn literal_path_missing_is_package_error() {
        let dir = TempDir::new().unwrap();
        let err = resolve_artifact_path(dir.path(), "dist/plugin.jar").unwrap_err();
        assert_eq!(err.code.as_str(), "package.failed");
    }

    #[test]
    fn glob_pattern_picks_newest_match() {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("plugin-1.0.0.jar")).unwrap();
        f.write_all(b"old").unwrap();
        drop(f);

        thread::sleep(Duration::from_millis(50));

        let new_file = dir.path().join("plugin-1.0.1.jar");
        let mut f = File::create(&new_file).unwrap();
        f.write_all(b"new").unwrap();
        drop(f);

        let result = resolve_artifact_path(dir.path(), "plugin-*.jar");
        assert_eq!(result.unwrap(), new_file);
    }

    #[test]
    fn glob_pattern_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("plugin-1.0.0.jar")).unwrap();

        let result = resolve_artifact_path(dir.path(), "plugin-*.jar");
        assert!(result.is_err());
    }

    #[test]
    fn glob_char_detection() {
        assert!(contains_glob_chars("dist/*.jar"));
        assert!(contains_glob_chars("plugin-?.zip"));
        assert!(!contains_glob_chars("dist/plugin.jar"));
    }
}
