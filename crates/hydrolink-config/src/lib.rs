//! Typed configuration for the Hydrolink service.
//!
//! Every component receives its settings from an [`AppConfig`] injected at
//! construction; nothing reads process-global state. Configuration is merged
//! from an optional TOML file and `HYDROLINK__SECTION__KEY` environment
//! overrides, then validated.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

pub mod loader;

pub use loader::load_config;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Manifest source (the file-listing service).
    #[serde(default)]
    pub manifest: ManifestConfig,
    /// Geospatial registry (map/feature/coverage layers).
    #[serde(default)]
    pub geospatial: GeospatialConfig,
    /// Time-series registry.
    #[serde(default)]
    pub timeseries: TimeseriesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.manifest.base_url.is_empty() {
            return Err("manifest.base_url must not be empty".into());
        }
        if self.geospatial.base_url.is_some() {
            if self.geospatial.namespace_prefix.is_empty() {
                return Err("geospatial.namespace_prefix must not be empty".into());
            }
            if self.geospatial.data_dir.is_empty() {
                return Err("geospatial.data_dir must not be empty".into());
            }
            if self.geospatial.timeout_secs == 0 {
                return Err("geospatial.timeout_secs must be > 0".into());
            }
        }
        if self.timeseries.base_url.is_some() {
            if self.timeseries.data_dir.is_empty() {
                return Err("timeseries.data_dir must not be empty".into());
            }
            if self.timeseries.timeout_secs == 0 {
                return Err("timeseries.timeout_secs must be > 0".into());
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static bearer token required on the reconcile endpoint when set.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// API root of the manifest source, e.g. `https://www.hydroshare.org/hsapi`.
    #[serde(default = "default_manifest_url")]
    pub base_url: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            base_url: default_manifest_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeospatialConfig {
    /// REST root of the geospatial registry, e.g.
    /// `https://geoserver.example.org/geoserver/rest`. Unset disables the
    /// backend entirely.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Workspace names are `{namespace_prefix}-{resource_id}`.
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,
    /// Directory on the registry host where resource files are mounted.
    #[serde(default)]
    pub data_dir: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeospatialConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: String::new(),
            password: String::new(),
            namespace_prefix: default_namespace_prefix(),
            data_dir: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeospatialConfig {
    pub fn enabled(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeseriesConfig {
    /// Root of the time-series registry, e.g. `https://water.example.org/wds`.
    /// Unset disables the backend entirely.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Directory on the registry host where resource files are mounted.
    #[serde(default)]
    pub data_dir: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TimeseriesConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: String::new(),
            password: String::new(),
            data_dir: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TimeseriesConfig {
    pub fn enabled(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_manifest_url() -> String {
    "https://www.hydroshare.org/hsapi".to_string()
}

fn default_namespace_prefix() -> String {
    "HS".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
