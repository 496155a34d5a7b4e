use clap::Args;
use serde::Serialize;

use deckhand::config::Config;
use deckhand::git;
use deckhand::manifest::Manifest;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct VersionArgs {
    /// Path to deckhand.json (defaults to ./deckhand.json when present)
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionOutput {
    pub manifest_path: String,
    pub version: String,
    /// What a BleedingEdge release would publish as, when HEAD resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleeding_edge_version: Option<String>,
}

pub fn run(args: VersionArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<VersionOutput> {
    let config = Config::load(args.config.as_deref())?;
    let manifest = Manifest::load(&config.manifest_abs_path(), &config.version_pattern)?;

    let bleeding_edge_version = git::head_sha(config.root())
        .ok()
        .map(|sha| format!("{}.{}", manifest.version(), sha));

    Ok((
        VersionOutput {
            manifest_path: config.manifest_path.clone(),
            version: manifest.version().to_string(),
            bleeding_edge_version,
        },
        0,
    ))
}
