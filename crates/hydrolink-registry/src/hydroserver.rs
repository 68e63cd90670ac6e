//! Client for the time-series registry's management interface.

use hydrolink_config::TimeseriesConfig;
use hydrolink_core::RegistryEntry;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{RegistryError, Result};

/// Database-type tag sent with every registration.
const DATABASE_TYPE: &str = "odm2_sqlite";

#[derive(Debug, Deserialize)]
struct DatabaseRecord {
    database_id: String,
}

/// HTTP client for the time-series registry.
#[derive(Debug, Clone)]
pub struct HydroserverClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    data_dir: String,
}

impl HydroserverClient {
    /// Build a client from configuration; `None` when the backend is not
    /// configured.
    pub fn from_config(cfg: &TimeseriesConfig) -> Result<Option<Self>> {
        let Some(base_url) = &cfg.base_url else {
            return Ok(None);
        };
        let http = Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Some(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            data_dir: cfg.data_dir.trim_end_matches('/').to_string(),
        }))
    }

    /// List databases registered under the resource's network.
    pub async fn list_databases(&self, resource_id: &str) -> Result<Vec<RegistryEntry>> {
        let url = format!("{}/manage/network/{}/databases/", self.base_url, resource_id);
        let response = self.http.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(RegistryError::unexpected_status(
                response.status().as_u16(),
                url,
            ));
        }
        let records: Vec<DatabaseRecord> = response.json().await?;
        Ok(records
            .into_iter()
            .map(|r| RegistryEntry::timeseries(r.database_id))
            .collect())
    }

    /// Create the resource's network.
    pub async fn create_network(&self, resource_id: &str) -> Result<()> {
        let url = format!("{}/manage/networks/", self.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .form(&[("network_id", resource_id)])
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

    /// Delete the resource's network and every database under it.
    pub async fn delete_network(&self, resource_id: &str) -> Result<()> {
        let url = format!("{}/manage/network/{}/", self.base_url, resource_id);
        self.http
            .delete(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        Ok(())
    }

    /// Register one database. The registry answers 201 when created.
    pub async fn create_database(
        &self,
        resource_id: &str,
        identity: &str,
        title: &str,
        storage_path: &str,
    ) -> Result<()> {
        let url = format!("{}/manage/network/{}/databases/", self.base_url, resource_id);
        let database_path = format!("{}/{}", self.data_dir, storage_path);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .form(&[
                ("network_id", resource_id),
                ("database_id", identity),
                ("database_name", title),
                ("database_path", database_path.as_str()),
                ("database_type", DATABASE_TYPE),
            ])
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

    /// Delete one database by identity.
    pub async fn delete_database(&self, resource_id: &str, identity: &str) -> Result<()> {
        let url = format!(
            "{}/manage/network/{}/database/{}/",
            self.base_url, resource_id, identity
        );
        self.http
            .delete(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        Ok(())
    }

    /// Catalog URL for the whole network.
    pub fn network_catalog_url(&self, resource_id: &str) -> String {
        format!("{}/refts/catalog/?network_id={}", self.base_url, resource_id)
    }

    /// Catalog URL for one database.
    pub fn database_catalog_url(&self, resource_id: &str, identity: &str) -> String {
        format!(
            "{}/refts/catalog/?network_id={}&database_id={}",
            self.base_url, resource_id, identity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_backend_yields_no_client() {
        let none = HydroserverClient::from_config(&TimeseriesConfig::default()).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_catalog_urls() {
        let c = HydroserverClient::from_config(&TimeseriesConfig {
            base_url: Some("https://water.example.org/wds".into()),
            username: "admin".into(),
            password: "wds".into(),
            data_dir: "/wds/data".into(),
            timeout_secs: 5,
        })
        .unwrap()
        .unwrap();
        assert_eq!(
            c.network_catalog_url("r1"),
            "https://water.example.org/wds/refts/catalog/?network_id=r1"
        );
        assert_eq!(
            c.database_catalog_url("r1", "odm2"),
            "https://water.example.org/wds/refts/catalog/?network_id=r1&database_id=odm2"
        );
    }
}
