//! Default configuration values.
//!
//! All defaults mirror the conventions of the JetBrains-style plugin
//! registry protocol this tool was built against; every one of them can
//! be overridden in `deckhand.json`.

/// Config file looked up at the working-tree root.
pub const CONFIG_FILE: &str = "deckhand.json";

/// Repository-relative path of the version manifest.
pub const MANIFEST_PATH: &str = "resources/META-INF/plugin.xml";

/// Regex with one capture group matching the manifest's version field.
pub const VERSION_PATTERN: &str = "<version>([^<]*)</version>";

/// Numeric plugin identifier sent with the upload form.
pub const PLUGIN_ID: u64 = 7412;

/// Shell command producing the build artifact. The leading `rm -rf dist`
/// drops stale artifacts from earlier builds before the fresh jar lands.
pub const BUILD_COMMAND: &str =
    "rm -rf dist; .cache/pants-new/pants binary scripts/sdk:plugin-publish";

/// Path (or glob) of the artifact the build command produces.
pub const BUILD_ARTIFACT: &str = "dist/plugin-publish.jar";

/// Prefix for the release archive: `<prefix>_<version>.zip`, with the
/// artifact staged under `<prefix>/lib/` inside the archive.
pub const ARCHIVE_PREFIX: &str = "pants";

/// Registry base URL; the upload endpoint is `<base>/plugin/uploadPlugin`.
pub const REGISTRY_URL: &str = "https://plugins.jetbrains.com";

/// Environment variable holding the registry bearer token.
pub const TOKEN_ENV: &str = "DECKHAND_TOKEN";
