//! Release archive assembly.
//!
//! The registry expects a zip whose top-level directory matches the plugin
//! name, with the jar under `lib/`: `<prefix>/lib/<artifact>`. Entries are
//! written straight into the archive, so no staging directory is left
//! behind on any path.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::{Error, Result};
use crate::utils::artifact;

/// Archive filename for a resolved version: `<prefix>_<version>.zip`.
pub fn archive_name(prefix: &str, version: &str) -> String {
    format!("{}_{}.zip", prefix, version)
}

/// Package the build artifact into the release archive at the tree root.
///
/// `artifact_pattern` may be a literal path or a glob relative to `root`.
/// Returns the absolute path of the written archive.
pub fn assemble(
    root: &Path,
    artifact_pattern: &str,
    prefix: &str,
    version: &str,
) -> Result<PathBuf> {
    let artifact_path = artifact::resolve_artifact_path(root, artifact_pattern)?;

    let artifact_file_name = artifact_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            Error::package_failed(format!(
                "Artifact path has no file name: {}",
                artifact_path.display()
            ))
        })?;

    let archive_path = root.join(archive_name(prefix, version));
    log_status!("package", "Packaging {} into {}", artifact_file_name, archive_path.display());

    let file = File::create(&archive_path).map_err(|e| {
        Error::package_failed(format!("Cannot create {}: {}", archive_path.display(), e))
    })?;

    write_archive(file, &artifact_path, prefix, &artifact_file_name).map_err(|e| {
        // Half-written archives are not useful to anyone.
        let _ = std::fs::remove_file(&archive_path);
        e
    })?;

    log_status!("package", "{} built successfully", archive_path.display());
    Ok(archive_path)
}

fn write_archive(
    file: File,
    artifact_path: &Path,
    prefix: &str,
    artifact_file_name: &str,
) -> Result<()> {
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    zip.add_directory(format!("{}/", prefix), options)
        .map_err(zip_error)?;
    zip.add_directory(format!("{}/lib/", prefix), options)
        .map_err(zip_error)?;
    zip.start_file(format!("{}/lib/{}", prefix, artifact_file_name), options)
        .map_err(zip_error)?;

    let mut source = File::open(artifact_path).map_err(|e| {
        Error::package_failed(format!("Cannot read {}: {}", artifact_path.display(), e))
    })?;
    io::copy(&mut source, &mut zip)
        .map_err(|e| Error::package_failed(format!("Copy into archive failed: {}", e)))?;

    let mut inner = zip
        .finish()
        .map_err(zip_error)?;
    inner
        .flush()
        .map_err(|e| Error::package_failed(format!("Flush archive failed: {}", e)))?;

    Ok(())
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::package_failed(format!("Zip write failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn archive_name_is_prefix_underscore_version_zip() {
        assert_eq!(archive_name("pants", "1.2.3.abcdef"), "pants_1.2.3.abcdef.zip");
        assert_eq!(archive_name("myplugin", "2.0"), "myplugin_2.0.zip");
    }

    #[test]
    fn assemble_stages_artifact_under_lib() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/plugin-publish.jar"), b"jar-bytes").unwrap();

        let archive = assemble(dir.path(), "dist/plugin-publish.jar", "pants", "1.2.3.abcdef").unwrap();
        assert_eq!(
            archive.file_name().unwrap().to_str().unwrap(),
            "pants_1.2.3.abcdef.zip"
        );

        let file = File::open(&archive).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        let mut entry = zip.by_name("pants/lib/plugin-publish.jar").unwrap();
        let mut body = Vec::new();
        io::Read::read_to_end(&mut entry, &mut body).unwrap();
        assert_eq!(body, b"jar-bytes");
    }

    #[test]
    fn assemble_with_missing_artifact_is_package_error() {
        let dir = TempDir::new().unwrap();
        let err = assemble(dir.path(), "dist/plugin.jar", "pants", "1.0").unwrap_err();
        assert_eq!(err.code.as_str(), "package.failed");
        assert!(!dir.path().join("pants_1.0.zip").exists());
    }

    #[test]
    fn assemble_resolves_glob_artifacts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/plugin-0.9.jar"), b"jar").unwrap();

        let archive = assemble(dir.path(), "dist/plugin-*.jar", "pants", "0.9").unwrap();
        assert!(archive.exists());

        let file = File::open(&archive).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        assert!(zip.by_name("pants/lib/plugin-0.9.jar").is_ok());
    }
}
