//! Remote plugin registry: upload and listing access.
//!
//! The upload endpoint is known to report error statuses for uploads that
//! actually landed, so [`Registry::upload`] returns a recorded outcome
//! instead of a `Result` — it is fire-and-record. Publication is confirmed
//! separately via [`confirm`], which text-searches the public listing page.
//! That read-side check is the authoritative publish signal.

use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::release::Channel;

/// One upload attempt, as sent to the registry.
#[derive(Debug)]
pub struct UploadRequest<'a> {
    pub plugin_id: u64,
    pub channel: Channel,
    pub archive: &'a Path,
}

/// What happened when the upload was issued. Never trusted as a publish
/// confirmation; recorded verbatim into the release report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    /// Whether the registry reported success. Informational only.
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Narrow seam over the remote registry, stubbed out in tests.
pub trait Registry {
    fn upload(&self, request: &UploadRequest) -> UploadOutcome;
    fn fetch_listing(&self) -> Result<String>;
    fn listing_url(&self) -> &str;
}

/// Check whether the registry listing shows evidence of the release.
///
/// Presence of `needle` as a substring of the listing body is the publish
/// signal; the upload call's own status is ignored here.
pub fn confirm(registry: &dyn Registry, needle: &str) -> Result<bool> {
    let body = registry.fetch_listing()?;
    let found = body.contains(needle);

    if found {
        log_status!("verify", "Found '{}' in {}", needle, registry.listing_url());
    } else {
        log_status!("verify", "'{}' not present in {}", needle, registry.listing_url());
    }

    Ok(found)
}

/// Registry client speaking the multipart upload + listing-page protocol.
pub struct HttpRegistry {
    client: reqwest::blocking::Client,
    upload_url: String,
    listing_url: String,
    token: Option<String>,
}

impl HttpRegistry {
    /// Build a client from config; the bearer token comes from the
    /// environment and its absence is fatal here, before any upload.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            upload_url: config.upload_url(),
            listing_url: config.listing_url(),
            token: Some(config.registry_token()?),
        })
    }

    /// Read-side client for listing checks only. The listing page is
    /// public, so no token is resolved; uploads through this client fail.
    pub fn verifier_from_config(config: &Config) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            upload_url: config.upload_url(),
            listing_url: config.listing_url(),
            token: None,
        }
    }

    fn send_upload(&self, request: &UploadRequest) -> Result<(u16, String)> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| Error::config_missing_key("token", None))?;

        let form = reqwest::blocking::multipart::Form::new()
            .text("pluginId", request.plugin_id.to_string())
            .text("channel", request.channel.as_str().to_string())
            .file("file", request.archive)
            .map_err(|e| {
                Error::internal_io(
                    format!("Cannot attach {}: {}", request.archive.display(), e),
                    Some("upload archive".to_string()),
                )
            })?;

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .map_err(|e| Error::registry_request_failed(self.upload_url.clone(), e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok((status, body))
    }
}

impl Registry for HttpRegistry {
    fn upload(&self, request: &UploadRequest) -> UploadOutcome {
        log_status!("upload", "Uploading {} to {}", request.archive.display(), self.upload_url);

        match self.send_upload(request) {
            Ok((status, body)) => {
                let accepted = (200..300).contains(&status);
                UploadOutcome {
                    accepted,
                    status: Some(status),
                    detail: if accepted { None } else { Some(body) },
                }
            }
            Err(e) => UploadOutcome {
                accepted: false,
                status: None,
                detail: Some(e.to_string()),
            },
        }
    }

    fn fetch_listing(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.listing_url)
            .send()
            .map_err(|e| Error::registry_request_failed(self.listing_url.clone(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::registry_request_failed(
                self.listing_url.clone(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        response
            .text()
            .map_err(|e| Error::registry_request_failed(self.listing_url.clone(), e.to_string()))
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }
}
