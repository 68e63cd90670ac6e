//! Client for the geospatial registry's REST interface.
//!
//! Store identities may contain spaces (identity segments are joined by a
//! space); reqwest percent-encodes them when the request URL is parsed, so
//! paths here are built by plain string formatting.

use hydrolink_config::GeospatialConfig;
use hydrolink_core::{RegistryEntry, StoreKind};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RegistryError, Result};

const RECURSIVE_DELETE_PARAMS: [(&str, &str); 2] = [("update", "overwrite"), ("recurse", "true")];

/// Native bounding box reported by a store descriptor.
///
/// `crs` is either a bare string (`"EPSG:4326"`) or an object whose `$`
/// member carries the code, depending on the projection class.
#[derive(Debug, Clone, Deserialize)]
pub struct NativeBoundingBox {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
    #[serde(default)]
    pub crs: Value,
}

impl NativeBoundingBox {
    pub fn crs_code(&self) -> &str {
        match &self.crs {
            Value::String(s) => s,
            Value::Object(map) => map.get("$").and_then(Value::as_str).unwrap_or("EPSG:4326"),
            _ => "EPSG:4326",
        }
    }
}

/// HTTP client for the geospatial registry.
#[derive(Debug, Clone)]
pub struct GeoserverClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    namespace_prefix: String,
    data_dir: String,
}

impl GeoserverClient {
    /// Build a client from configuration; `None` when the backend is not
    /// configured.
    pub fn from_config(cfg: &GeospatialConfig) -> Result<Option<Self>> {
        let Some(base_url) = &cfg.base_url else {
            return Ok(None);
        };
        let http = Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Some(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            namespace_prefix: cfg.namespace_prefix.clone(),
            data_dir: cfg.data_dir.trim_end_matches('/').to_string(),
        }))
    }

    /// Workspace (namespace) holding everything published for one resource.
    pub fn workspace(&self, resource_id: &str) -> String {
        format!("{}-{}", self.namespace_prefix, resource_id)
    }

    /// Service root for OGC endpoints: the REST base minus its last path
    /// segment (`…/geoserver/rest` → `…/geoserver`).
    pub fn service_root(&self) -> &str {
        match self.base_url.rsplit_once('/') {
            Some((root, _)) => root,
            None => &self.base_url,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header("content-type", "application/json")
    }

    /// List registered stores of one kind within the resource's workspace.
    pub async fn list_stores(
        &self,
        resource_id: &str,
        kind: StoreKind,
    ) -> Result<Vec<RegistryEntry>> {
        let (listing, list_key, item_key) = match kind {
            StoreKind::Vector => ("datastores.json", "dataStores", "dataStore"),
            StoreKind::Coverage => ("coverages.json", "coverages", "coverage"),
        };
        let url = format!(
            "{}/workspaces/{}/{}",
            self.base_url,
            self.workspace(resource_id),
            listing
        );
        let response = self.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        let body: Value = response.json().await?;

        // An empty workspace answers with an empty string instead of an
        // object, so dig defensively.
        let mut entries = Vec::new();
        if let Some(items) = body
            .get(list_key)
            .and_then(|v| v.get(item_key))
            .and_then(Value::as_array)
        {
            for item in items {
                if let Some(name) = item.get("name").and_then(Value::as_str) {
                    entries.push(RegistryEntry::geospatial(name, kind));
                }
            }
        }
        Ok(entries)
    }

    /// Create the resource's workspace.
    pub async fn create_workspace(&self, resource_id: &str) -> Result<()> {
        let url = format!("{}/workspaces", self.base_url);
        let body = serde_json::json!({"workspace": {"name": self.workspace(resource_id)}});
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(())
    }

    /// Recursively delete the resource's workspace and everything in it.
    pub async fn delete_workspace(&self, resource_id: &str) -> Result<()> {
        let url = format!("{}/workspaces/{}", self.base_url, self.workspace(resource_id));
        self.http
            .delete(&url)
            .query(&RECURSIVE_DELETE_PARAMS)
            .basic_auth(&self.username, Some(&self.password))
            .header("content-type", "application/json")
            .send()
            .await?;
        Ok(())
    }

    /// Register a store backed by an externally-located file. The registry
    /// answers 201 when the store is created.
    pub async fn register_external_store(
        &self,
        resource_id: &str,
        kind: StoreKind,
        identity: &str,
        storage_path: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/workspaces/{}/{}/{}/external.{}",
            self.base_url,
            self.workspace(resource_id),
            kind.collection(),
            identity,
            kind.file_type()
        );
        let body = format!("file://{}/{}", self.data_dir, storage_path);
        let response = self
            .http
            .put(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?;
        if response.status() != StatusCode::CREATED {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(())
    }

    fn descriptor_url(
        &self,
        resource_id: &str,
        kind: StoreKind,
        identity: &str,
        file_stem: &str,
    ) -> String {
        format!(
            "{}/workspaces/{}/{}/{}/{}/{}.json",
            self.base_url,
            self.workspace(resource_id),
            kind.collection(),
            identity,
            kind.layer_group(),
            file_stem
        )
    }

    /// Fetch a freshly-registered store's descriptor document.
    pub async fn fetch_store_descriptor(
        &self,
        resource_id: &str,
        kind: StoreKind,
        identity: &str,
        file_stem: &str,
    ) -> Result<Value> {
        let url = self.descriptor_url(resource_id, kind, identity, file_stem);
        let response = self.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(response.json().await?)
    }

    /// Resubmit a (modified) store descriptor. The registry answers 200.
    pub async fn put_store_descriptor(
        &self,
        resource_id: &str,
        kind: StoreKind,
        identity: &str,
        file_stem: &str,
        descriptor: &Value,
    ) -> Result<()> {
        let url = self.descriptor_url(resource_id, kind, identity, file_stem);
        let response = self
            .http
            .put(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(descriptor)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(())
    }

    /// Upload a styled-layer-descriptor document into the resource's
    /// workspace. The registry answers 201.
    pub async fn create_style(&self, resource_id: &str, sld: String) -> Result<()> {
        let url = format!(
            "{}/workspaces/{}/styles",
            self.base_url,
            self.workspace(resource_id)
        );
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("content-type", "application/vnd.ogc.sld+xml")
            .body(sld)
            .send()
            .await?;
        if response.status() != StatusCode::CREATED {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(())
    }

    /// Bind the workspace style named after the layer as the layer's default.
    pub async fn set_default_style(&self, resource_id: &str, identity: &str) -> Result<()> {
        let url = format!(
            "{}/layers/{}:{}",
            self.base_url,
            self.workspace(resource_id),
            identity
        );
        let body = serde_json::json!({"layer": {"defaultStyle": {"name": identity}}});
        let response = self
            .http
            .put(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        Ok(())
    }

    /// Recursively delete one store by identity.
    pub async fn delete_store(
        &self,
        resource_id: &str,
        kind: StoreKind,
        identity: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/workspaces/{}/{}/{}",
            self.base_url,
            self.workspace(resource_id),
            kind.collection(),
            identity
        );
        self.http
            .delete(&url)
            .query(&RECURSIVE_DELETE_PARAMS)
            .basic_auth(&self.username, Some(&self.password))
            .header("content-type", "application/json")
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeoserverClient {
        GeoserverClient::from_config(&GeospatialConfig {
            base_url: Some("https://geo.example.org/geoserver/rest".into()),
            username: "admin".into(),
            password: "geoserver".into(),
            namespace_prefix: "HS".into(),
            data_dir: "/geoserver/data".into(),
            timeout_secs: 5,
        })
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_disabled_backend_yields_no_client() {
        let none = GeoserverClient::from_config(&GeospatialConfig::default()).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_workspace_and_service_root() {
        let c = client();
        assert_eq!(c.workspace("abc123"), "HS-abc123");
        assert_eq!(c.service_root(), "https://geo.example.org/geoserver");
    }

    #[test]
    fn test_crs_code_variants() {
        let plain = NativeBoundingBox {
            minx: 0.0,
            miny: 0.0,
            maxx: 1.0,
            maxy: 1.0,
            crs: Value::String("EPSG:26912".into()),
        };
        assert_eq!(plain.crs_code(), "EPSG:26912");

        let projected = NativeBoundingBox {
            minx: 0.0,
            miny: 0.0,
            maxx: 1.0,
            maxy: 1.0,
            crs: serde_json::json!({"@class": "projected", "$": "EPSG:26912"}),
        };
        assert_eq!(projected.crs_code(), "EPSG:26912");

        let missing = NativeBoundingBox {
            minx: 0.0,
            miny: 0.0,
            maxx: 1.0,
            maxy: 1.0,
            crs: Value::Null,
        };
        assert_eq!(missing.crs_code(), "EPSG:4326");
    }
}
