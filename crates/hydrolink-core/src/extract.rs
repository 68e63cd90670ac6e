//! Desired-state extraction: classify manifest entries into artifacts.

use crate::artifact::DesiredArtifact;
use crate::manifest::{ManifestEntry, ManifestPath};

const RASTER_LOGICAL_TYPE: &str = "GeoRasterLogicalFile";
const RASTER_CONTENT_TYPE: &str = "image/tiff";
const RASTER_EXTENSION: &str = "tif";

const FEATURE_LOGICAL_TYPE: &str = "GeoFeatureLogicalFile";
const FEATURE_CONTENT_TYPE: &str = "application/x-qgis";
const FEATURE_EXTENSION: &str = "shp";

const TIMESERIES_LOGICAL_TYPE: &str = "TimeSeriesLogicalFile";
const TIMESERIES_EXTENSIONS: [&str; 2] = ["sqlite", "db"];

/// Desired artifacts per backend, in manifest order, deduplicated by identity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DesiredState {
    pub geospatial: Vec<DesiredArtifact>,
    pub timeseries: Vec<DesiredArtifact>,
}

impl DesiredState {
    pub fn is_empty(&self) -> bool {
        self.geospatial.is_empty() && self.timeseries.is_empty()
    }
}

/// Classify manifest entries into desired artifacts.
///
/// An entry becomes an artifact only when its logical-file-type /
/// content-type / extension triple matches one of the three recognized
/// combinations and the relevant backend is configured. Everything else is
/// dropped silently: a manifest full of unpublishable files is a normal,
/// empty desired state, not an error.
///
/// When two entries collapse to the same identity (a raster aggregation
/// folder holding several tifs, for example) the first observed entry wins.
pub fn extract_desired(
    entries: &[ManifestEntry],
    geospatial_enabled: bool,
    timeseries_enabled: bool,
) -> DesiredState {
    let mut state = DesiredState::default();

    for entry in entries {
        let Ok(path) = ManifestPath::parse(&entry.url) else {
            tracing::debug!(url = %entry.url, "skipping manifest entry with unparsable URL");
            continue;
        };

        if geospatial_enabled
            && entry.logical_file_type == RASTER_LOGICAL_TYPE
            && entry.content_type == RASTER_CONTENT_TYPE
            && path.extension() == RASTER_EXTENSION
        {
            push_unique(
                &mut state.geospatial,
                DesiredArtifact::GeoRasterLayer {
                    identity: path.layer_identity(),
                    storage_path: path.storage_path(),
                    file_stem: path.file_stem(),
                },
            );
        } else if geospatial_enabled
            && entry.logical_file_type == FEATURE_LOGICAL_TYPE
            && entry.content_type == FEATURE_CONTENT_TYPE
            && path.extension() == FEATURE_EXTENSION
        {
            push_unique(
                &mut state.geospatial,
                DesiredArtifact::GeoVectorLayer {
                    identity: path.layer_identity(),
                    storage_path: path.storage_path(),
                    file_stem: path.file_stem(),
                },
            );
        } else if timeseries_enabled
            && entry.logical_file_type == TIMESERIES_LOGICAL_TYPE
            && TIMESERIES_EXTENSIONS.contains(&path.extension())
        {
            push_unique(
                &mut state.timeseries,
                DesiredArtifact::TimeSeriesDatabase {
                    identity: path.database_identity(),
                    storage_path: path.storage_path(),
                    title: path.file_stem(),
                },
            );
        }
    }

    state
}

fn push_unique(artifacts: &mut Vec<DesiredArtifact>, artifact: DesiredArtifact) {
    if artifacts.iter().any(|a| a.identity() == artifact.identity()) {
        tracing::debug!(
            identity = %artifact.identity(),
            "duplicate identity in manifest, keeping first observed entry"
        );
        return;
    }
    artifacts.push(artifact);
}
