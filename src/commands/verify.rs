use clap::Args;
use serde::Serialize;

use deckhand::config::Config;
use deckhand::manifest::Manifest;
use deckhand::registry::{self, HttpRegistry};
use deckhand::Error;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct VerifyArgs {
    /// String to search the registry listing for
    /// (defaults to the current manifest version)
    #[arg(long)]
    pub needle: Option<String>,

    /// Path to deckhand.json (defaults to ./deckhand.json when present)
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutput {
    pub needle: String,
    pub listing_url: String,
    pub published: bool,
}

pub fn run(args: VerifyArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<VerifyOutput> {
    let config = Config::load(args.config.as_deref())?;

    let needle = match args.needle {
        Some(n) => n,
        None => Manifest::load(&config.manifest_abs_path(), &config.version_pattern)?
            .version()
            .to_string(),
    };

    let registry = HttpRegistry::verifier_from_config(&config);
    let published = registry::confirm(&registry, &needle)?;

    if !published {
        return Err(Error::release_unconfirmed(needle, config.listing_url()));
    }

    Ok((
        VerifyOutput {
            needle,
            listing_url: config.listing_url(),
            published: true,
        },
        0,
    ))
}
