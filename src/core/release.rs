//! The release workflow: one linear pipeline per invocation.
//!
//! Read the manifest, disambiguate the version for BleedingEdge builds,
//! build, package, restore the manifest, then upload and confirm. The
//! manifest restore is owned by a [`RestoreGuard`](crate::manifest::RestoreGuard):
//! any error that propagates past the guard still puts the committed
//! content back.

use serde::Serialize;

use crate::build::{self, BuildOutput};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::git;
use crate::manifest::Manifest;
use crate::package;
use crate::registry::{self, Registry, UploadOutcome, UploadRequest};

/// Release track controlling which registry consumers see the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    BleedingEdge,
    Stable,
}

impl Channel {
    /// Wire name expected by the registry's upload form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::BleedingEdge => "BleedingEdge",
            Channel::Stable => "Stable",
        }
    }

    /// Stable iff an explicit non-empty release tag was supplied.
    pub fn for_tag(tag: Option<&str>) -> Channel {
        match tag {
            Some(t) if !t.is_empty() => Channel::Stable,
            _ => Channel::BleedingEdge,
        }
    }
}

impl Serialize for Channel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    /// Non-empty tag selects the Stable channel and suppresses version
    /// mutation; otherwise the head sha is appended to the version.
    pub tag: Option<String>,
    /// Stop after packaging, before any network call.
    pub skip_publish: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRun {
    pub channel: Channel,
    pub base_version: String,
    /// The version the artifact was built and archived as.
    pub release_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_sha: Option<String>,
    pub archive: String,
    pub build: BuildOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadOutcome>,
    /// Authoritative publish signal from the listing check.
    /// None when publish was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// Run the full release workflow.
///
/// `registry` must be supplied unless `skip_publish` is set. Fatal errors
/// before mutation (missing version field, unresolvable head) abort with
/// no cleanup needed; build and packaging failures restore the manifest
/// before surfacing.
pub fn run(
    config: &Config,
    options: &ReleaseOptions,
    registry: Option<&dyn Registry>,
) -> Result<ReleaseRun> {
    let channel = Channel::for_tag(options.tag.as_deref());
    let root = config.root().to_path_buf();

    // Guard against a prior failed run leaving the manifest dirty.
    git::checkout_file(&root, &config.manifest_path)?;

    let manifest = Manifest::load(&config.manifest_abs_path(), &config.version_pattern)?;
    let base_version = manifest.version().to_string();

    let (release_version, head_sha) = match channel {
        Channel::Stable => (base_version.clone(), None),
        Channel::BleedingEdge => {
            let sha = git::head_sha(&root)?;
            log_status!("release", "Appending head sha {} to plugin version", sha);
            (format!("{}.{}", base_version, sha), Some(sha))
        }
    };

    log_status!("release", "Releasing {} to {} channel", release_version, channel.as_str());

    // Mutation only happens for BleedingEdge; the guard owns the restore.
    let guard = match channel {
        Channel::BleedingEdge => Some(manifest.write_version(&release_version)?),
        Channel::Stable => None,
    };

    let build = build::run_build(&root, &config.build_command);

    let packaged = if build.success {
        package::assemble(
            &root,
            &config.build_artifact,
            &config.archive_prefix,
            &release_version,
        )
    } else {
        Err(Error::build_failed(
            build.command.clone(),
            build.exit_code,
            build.output.stdout.clone(),
            build.output.stderr.clone(),
        ))
    };

    // Scoped cleanup: runs regardless of build/package outcome. The guard's
    // drop impl covers any path that errors out before this point.
    let restored = match guard {
        Some(g) => g.restore(),
        None => Ok(()),
    };

    let archive = match (packaged, restored) {
        (Ok(archive), Ok(())) => archive,
        (Ok(_), Err(restore_err)) => return Err(restore_err),
        (Err(err), Ok(())) => return Err(err),
        (Err(err), Err(restore_err)) => {
            // The build/package error leads, but a failed restore leaves
            // the manifest mutated on disk and must stay visible.
            return Err(err.with_hint(format!(
                "Manifest restore also failed, {} is still mutated: {}",
                config.manifest_path, restore_err
            )));
        }
    };

    let mut run = ReleaseRun {
        channel,
        base_version,
        release_version,
        head_sha,
        archive: archive.to_string_lossy().to_string(),
        build,
        upload: None,
        published: None,
    };

    if options.skip_publish {
        log_status!("release", "Publishing skipped");
        return Ok(run);
    }

    let registry = registry.ok_or_else(|| {
        Error::internal_unexpected("release::run requires a registry unless skipPublish is set")
    })?;

    let outcome = registry.upload(&UploadRequest {
        plugin_id: config.plugin_id,
        channel,
        archive: &archive,
    });
    if !outcome.accepted {
        // Known-unreliable endpoint; the listing check below decides.
        log_status!("upload", "Upload reported failure: {:?}", outcome.detail);
    }
    run.upload = Some(outcome);

    let needle = verification_needle(&run).to_string();
    run.published = Some(registry::confirm(registry, &needle)?);

    Ok(run)
}

/// Error for a release the listing check could not confirm. The full run
/// report rides along in the details so machine consumers still get the
/// build and upload outcomes.
pub fn unconfirmed_error(run: &ReleaseRun, listing_url: &str) -> Error {
    let mut err = Error::release_unconfirmed(verification_needle(run), listing_url);
    if let (serde_json::Value::Object(details), Ok(report)) =
        (&mut err.details, serde_json::to_value(run))
    {
        details.insert("run".to_string(), report);
    }
    err
}

/// What to search the listing body for: the sha disambiguates BleedingEdge
/// builds; Stable releases are identified by the full version.
fn verification_needle(run: &ReleaseRun) -> &str {
    match run.head_sha.as_deref() {
        Some(sha) => sha,
        None => &run.release_version,
    }
}
