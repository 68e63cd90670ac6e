//! Desired artifacts and live registry entries.

use serde::{Deserialize, Serialize};

/// The two store flavors the geospatial registry distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    /// Raster layers, backed by coverage stores.
    Coverage,
    /// Vector/feature layers, backed by data stores.
    Vector,
}

impl StoreKind {
    /// REST collection the store lives under.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Coverage => "coveragestores",
            Self::Vector => "datastores",
        }
    }

    /// Layer-group path segment used when fetching the store descriptor.
    pub fn layer_group(&self) -> &'static str {
        match self {
            Self::Coverage => "coverages",
            Self::Vector => "featuretypes",
        }
    }

    /// Root key of the store descriptor document.
    pub fn descriptor_key(&self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::Vector => "featureType",
        }
    }

    /// File type tag used when registering the backing file.
    pub fn file_type(&self) -> &'static str {
        match self {
            Self::Coverage => "geotiff",
            Self::Vector => "shp",
        }
    }
}

/// A publishable unit derived from one manifest entry.
///
/// Each variant carries exactly the fields its registration workflow needs;
/// `identity` is the deterministic name the artifact is addressed by within
/// its backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredArtifact {
    GeoRasterLayer {
        identity: String,
        storage_path: String,
        file_stem: String,
    },
    GeoVectorLayer {
        identity: String,
        storage_path: String,
        file_stem: String,
    },
    TimeSeriesDatabase {
        identity: String,
        storage_path: String,
        title: String,
    },
}

impl DesiredArtifact {
    pub fn identity(&self) -> &str {
        match self {
            Self::GeoRasterLayer { identity, .. }
            | Self::GeoVectorLayer { identity, .. }
            | Self::TimeSeriesDatabase { identity, .. } => identity,
        }
    }

    pub fn storage_path(&self) -> &str {
        match self {
            Self::GeoRasterLayer { storage_path, .. }
            | Self::GeoVectorLayer { storage_path, .. }
            | Self::TimeSeriesDatabase { storage_path, .. } => storage_path,
        }
    }

    /// Externally-visible artifact kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GeoRasterLayer { .. } => "GeographicRaster",
            Self::GeoVectorLayer { .. } => "GeographicFeature",
            Self::TimeSeriesDatabase { .. } => "Timeseries",
        }
    }

    /// Store kind for geospatial artifacts; `None` for time-series.
    pub fn store_kind(&self) -> Option<StoreKind> {
        match self {
            Self::GeoRasterLayer { .. } => Some(StoreKind::Coverage),
            Self::GeoVectorLayer { .. } => Some(StoreKind::Vector),
            Self::TimeSeriesDatabase { .. } => None,
        }
    }
}

/// One artifact currently registered in a backend.
///
/// `store_kind` is `Some` for geospatial entries and `None` for time-series
/// databases, which have a single flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub identity: String,
    pub store_kind: Option<StoreKind>,
}

impl RegistryEntry {
    pub fn geospatial(identity: impl Into<String>, store_kind: StoreKind) -> Self {
        Self {
            identity: identity.into(),
            store_kind: Some(store_kind),
        }
    }

    pub fn timeseries(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            store_kind: None,
        }
    }
}
