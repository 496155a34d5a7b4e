use clap::Args;
use deckhand::config::Config;
use deckhand::registry::HttpRegistry;
use deckhand::release::{self, ReleaseOptions, ReleaseRun};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ReleaseArgs {
    /// Release tag; when present and non-empty the Stable channel is used
    /// and the manifest version is left untouched
    #[arg(long)]
    pub tag: Option<String>,

    /// Build and package, but skip the registry upload
    #[arg(long)]
    pub skip_publish: bool,

    /// Path to deckhand.json (defaults to ./deckhand.json when present)
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run(args: ReleaseArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ReleaseRun> {
    let config = Config::load(args.config.as_deref())?;
    let options = ReleaseOptions {
        tag: args.tag,
        skip_publish: args.skip_publish,
    };

    if options.skip_publish {
        let run = release::run(&config, &options, None)?;
        return Ok((run, 0));
    }

    // Token resolution happens here, before any mutation or build work.
    let registry = HttpRegistry::from_config(&config)?;
    let run = release::run(&config, &options, Some(&registry))?;

    // The listing check is the authoritative publish signal. An unconfirmed
    // release is an error; its details carry the full run report.
    match run.published {
        Some(true) => Ok((run, 0)),
        _ => Err(release::unconfirmed_error(&run, &config.listing_url())),
    }
}
