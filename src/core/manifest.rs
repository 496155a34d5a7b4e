//! Version manifest: load, transient mutation, guaranteed restore.
//!
//! The manifest is the one piece of persistent state this tool touches.
//! A release run may rewrite its version field so the external build picks
//! up the disambiguated version, but the file on disk must equal its
//! pre-run content once the process exits, on every path. That contract is
//! carried by [`RestoreGuard`]: mutation hands back a guard holding the
//! pre-mutation snapshot, and the snapshot is written back either through
//! an explicit [`RestoreGuard::restore`] call or, as a backstop, on drop.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::{io, parser};

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    pattern: String,
    content: String,
    version: String,
}

impl Manifest {
    /// Read the manifest and extract its version field.
    pub fn load(path: &Path, pattern: &str) -> Result<Manifest> {
        let content = io::read_file(path, "read manifest")?;

        let version = parser::extract_first(&content, pattern).ok_or_else(|| {
            Error::manifest_missing_field(path.to_string_lossy(), pattern.to_string())
        })?;

        Ok(Manifest {
            path: path.to_path_buf(),
            pattern: pattern.to_string(),
            content,
            version,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Persist a new version value and return the guard that restores the
    /// pre-mutation content.
    pub fn write_version(&self, new_version: &str) -> Result<RestoreGuard> {
        let (mutated, count) = parser::replace_all(&self.content, &self.pattern, new_version)
            .ok_or_else(|| {
                Error::config_invalid_value(
                    "versionPattern",
                    Some(self.pattern.clone()),
                    "pattern failed to compile",
                )
            })?;

        if count == 0 {
            return Err(Error::manifest_missing_field(
                self.path.to_string_lossy(),
                self.pattern.clone(),
            ));
        }

        io::write_file_atomic(&self.path, &mutated, "write manifest")?;

        Ok(RestoreGuard {
            path: self.path.clone(),
            snapshot: self.content.clone(),
            armed: true,
        })
    }
}

/// Restores a manifest to its pre-mutation snapshot.
///
/// Restore happens exactly once: explicitly via [`restore`](Self::restore)
/// on hand-written exit paths, or on drop when an error propagates past the
/// guard. Drop cannot surface an IO failure, so the explicit call is the
/// primary path and drop is the backstop.
#[derive(Debug)]
pub struct RestoreGuard {
    path: PathBuf,
    snapshot: String,
    armed: bool,
}

impl RestoreGuard {
    /// Write the snapshot back and disarm the guard.
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        io::write_file_atomic(&self.path, &self.snapshot, "restore manifest")
    }
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = io::write_file_atomic(&self.path, &self.snapshot, "restore manifest") {
            eprintln!(
                "[release] Failed to restore {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
