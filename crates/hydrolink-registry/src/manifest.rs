//! Client for the manifest source (the file-listing service).

use hydrolink_config::ManifestConfig;
use hydrolink_core::{FileListing, ManifestEntry};
use reqwest::Client;

use crate::error::{RegistryError, Result};

/// Access state of a resource as reported by the manifest source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAccess {
    /// Resource is private or does not exist; published artifacts must be
    /// torn down.
    Private,
    /// Resource is public; these are its manifest entries.
    Public(Vec<ManifestEntry>),
}

/// HTTP client for the manifest source.
#[derive(Debug, Clone)]
pub struct ManifestClient {
    http: Client,
    base_url: String,
}

impl ManifestClient {
    pub fn new(cfg: &ManifestConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the resource's file manifest.
    ///
    /// Any non-success response, transport failure or unparsable body is
    /// reported as [`ResourceAccess::Private`]: the manifest source answers
    /// identically for private and missing resources, and a resource we
    /// cannot list must not keep stale artifacts published.
    pub async fn file_list(&self, resource_id: &str) -> ResourceAccess {
        let url = format!("{}/resource/{}/file_list/", self.base_url, resource_id);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(resource_id = %resource_id, error = %e, "manifest fetch failed");
                return ResourceAccess::Private;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            tracing::info!(
                resource_id = %resource_id,
                status = %response.status(),
                "resource reported private or not found"
            );
            return ResourceAccess::Private;
        }
        match response.json::<FileListing>().await {
            Ok(listing) => ResourceAccess::Public(listing.results),
            Err(e) => {
                tracing::warn!(resource_id = %resource_id, error = %e, "unparsable manifest body");
                ResourceAccess::Private
            }
        }
    }

    /// Fetch the raster metadata sidecar that accompanies `storage_path`
    /// (same path, `.vrt` extension) and return its XML body.
    pub async fn fetch_sidecar(&self, storage_path: &str) -> Result<String> {
        let url = format!("{}/resource/{}", self.sidecar_root(), sidecar_path(storage_path));
        let response = self.http.get(&url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(response.text().await?)
    }

    /// Host root of the manifest source (API base minus its last path
    /// segment); sidecar documents are served from there, not from the API.
    fn sidecar_root(&self) -> String {
        match self.base_url.rsplit_once('/') {
            Some((root, _)) => root.to_string(),
            None => self.base_url.clone(),
        }
    }
}

fn sidecar_path(storage_path: &str) -> String {
    match storage_path.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.vrt"),
        None => format!("{storage_path}.vrt"),
    }
}
