//! Configuration loading: optional TOML file plus environment overrides.

use std::path::PathBuf;

use config::{Config, Environment, File};

use crate::AppConfig;

/// Load, merge and validate configuration.
///
/// Sources, later wins: the TOML file at `path` (or `hydrolink.toml` in the
/// working directory when `path` is `None`), then environment variables with
/// the `HYDROLINK` prefix and `__` separator, e.g.
/// `HYDROLINK__SERVER__PORT=9090` or
/// `HYDROLINK__GEOSPATIAL__BASE_URL=https://geo.example.org/geoserver/rest`.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            let pathbuf = PathBuf::from(p);
            if pathbuf.exists() {
                builder = builder.add_source(File::from(pathbuf));
            }
        }
        None => {
            let default_path = PathBuf::from("hydrolink.toml");
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }
    }
    builder = builder.add_source(
        Environment::with_prefix("HYDROLINK")
            .try_parsing(true)
            .separator("__"),
    );
    let cfg = builder
        .build()
        .map_err(|e| format!("config build error: {e}"))?;
    let merged: AppConfig = cfg
        .try_deserialize()
        .map_err(|e| format!("config deserialize error: {e}"))?;
    merged.validate()?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = load_config(Some("/definitely/not/here.toml")).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.geospatial.enabled());
    }

    fn temp_toml() -> tempfile::NamedTempFile {
        tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap()
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let mut file = temp_toml();
        write!(
            file,
            r#"
[server]
port = 9191

[geospatial]
base_url = "https://geo.example.org/geoserver/rest"
username = "admin"
password = "geoserver"
namespace_prefix = "HS"
data_dir = "/geoserver/data"

[timeseries]
base_url = "https://water.example.org/wds"
data_dir = "/wds/data"
"#
        )
        .unwrap();

        let cfg = load_config(file.path().to_str()).unwrap();
        assert_eq!(cfg.server.port, 9191);
        assert!(cfg.geospatial.enabled());
        assert!(cfg.timeseries.enabled());
        assert_eq!(cfg.geospatial.namespace_prefix, "HS");
    }

    #[test]
    fn test_invalid_file_config_is_rejected() {
        let mut file = temp_toml();
        write!(
            file,
            r#"
[geospatial]
base_url = "https://geo.example.org/geoserver/rest"
data_dir = ""
"#
        )
        .unwrap();

        let err = load_config(file.path().to_str()).unwrap_err();
        assert!(err.contains("data_dir"));
    }
}
