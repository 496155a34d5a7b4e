//! Release configuration loaded from `deckhand.json`.
//!
//! A missing config file is not an error; every field has a default so a
//! repository following the stock layout needs no config at all. Paths in
//! the config are relative to the working-tree root (the directory holding
//! the config file, or the current directory when defaults apply).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::utils::io;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub plugin_id: u64,
    pub manifest_path: String,
    pub version_pattern: String,
    pub build_command: String,
    pub build_artifact: String,
    pub archive_prefix: String,
    pub registry_url: String,
    /// Public listing page queried for publish confirmation.
    /// Defaults to `<registryUrl>/plugin/<pluginId>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    pub token_env: String,

    #[serde(skip)]
    root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_id: defaults::PLUGIN_ID,
            manifest_path: defaults::MANIFEST_PATH.to_string(),
            version_pattern: defaults::VERSION_PATTERN.to_string(),
            build_command: defaults::BUILD_COMMAND.to_string(),
            build_artifact: defaults::BUILD_ARTIFACT.to_string(),
            archive_prefix: defaults::ARCHIVE_PREFIX.to_string(),
            registry_url: defaults::REGISTRY_URL.to_string(),
            listing_url: None,
            token_env: defaults::TOKEN_ENV.to_string(),
            root: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// `deckhand.json` in the current directory is used when present and
    /// defaults apply otherwise.
    pub fn load(path: Option<&str>) -> Result<Config> {
        match path {
            Some(p) => Self::from_file(Path::new(p)),
            None => {
                let default_path = Path::new(defaults::CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Config> {
        let content = io::read_file(path, "read config")?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::config_invalid_json(path.to_string_lossy(), e))?;

        config.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if config.version_pattern.is_empty() {
            return Err(Error::config_invalid_value(
                "versionPattern",
                None,
                "must be a regex with one capture group",
            ));
        }

        Ok(config)
    }

    /// Working-tree root all relative paths resolve against.
    pub fn root(&self) -> &Path {
        if self.root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.root
        }
    }

    pub fn manifest_abs_path(&self) -> PathBuf {
        self.root().join(&self.manifest_path)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/plugin/uploadPlugin", self.registry_url.trim_end_matches('/'))
    }

    pub fn listing_url(&self) -> String {
        self.listing_url.clone().unwrap_or_else(|| {
            format!(
                "{}/plugin/{}",
                self.registry_url.trim_end_matches('/'),
                self.plugin_id
            )
        })
    }

    /// Resolve the registry token from the configured environment variable.
    /// A missing token is fatal before any upload is attempted.
    pub fn registry_token(&self) -> Result<String> {
        std::env::var(&self.token_env).map_err(|_| {
            Error::config_missing_key(self.token_env.clone(), None).with_hint(format!(
                "Export {} with a registry bearer token before publishing",
                self.token_env
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_config_file() {
        let config = Config::default();
        assert_eq!(config.plugin_id, 7412);
        assert_eq!(config.manifest_path, "resources/META-INF/plugin.xml");
        assert_eq!(config.archive_prefix, "pants");
        assert_eq!(
            config.build_command,
            "rm -rf dist; .cache/pants-new/pants binary scripts/sdk:plugin-publish"
        );
        assert_eq!(
            config.upload_url(),
            "https://plugins.jetbrains.com/plugin/uploadPlugin"
        );
        assert_eq!(
            config.listing_url(),
            "https://plugins.jetbrains.com/plugin/7412"
        );
    }

    #[test]
    fn camel_case_keys_parse_and_root_follows_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deckhand.json");
        fs::write(
            &path,
            r#"{
                "pluginId": 99,
                "manifestPath": "plugin.xml",
                "archivePrefix": "myplugin",
                "registryUrl": "https://registry.example/",
                "tokenEnv": "MY_TOKEN"
            }"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.plugin_id, 99);
        assert_eq!(config.root(), dir.path());
        assert_eq!(config.manifest_abs_path(), dir.path().join("plugin.xml"));
        assert_eq!(config.upload_url(), "https://registry.example/plugin/uploadPlugin");
        assert_eq!(config.listing_url(), "https://registry.example/plugin/99");
        assert_eq!(config.token_env, "MY_TOKEN");
    }

    #[test]
    fn explicit_listing_url_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deckhand.json");
        fs::write(&path, r#"{ "listingUrl": "https://mirror.example/p/1" }"#).unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.listing_url(), "https://mirror.example/p/1");
    }

    #[test]
    fn invalid_json_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deckhand.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load(Some(path.to_str().unwrap())).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = Config::load(Some("/nonexistent/deckhand.json")).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn missing_token_env_is_fatal() {
        let mut config = Config::default();
        config.token_env = "DECKHAND_TEST_UNSET_TOKEN".to_string();
        let err = config.registry_token().unwrap_err();
        assert_eq!(err.code.as_str(), "config.missing_key");
    }
}
