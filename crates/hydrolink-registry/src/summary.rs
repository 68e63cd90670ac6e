//! Endpoint summary assembly from verified registry state.

use hydrolink_core::{OperationResult, StoreKind};
use indexmap::IndexMap;
use serde::Serialize;

use crate::geoserver::GeoserverClient;
use crate::hydroserver::HydroserverClient;
use crate::verifier::VerifiedState;

/// The externally-visible reconciliation summary.
///
/// `resource` maps endpoint names to capability URLs for whatever is now
/// published; `content` lists every register attempt in registration order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ServiceSummary {
    pub resource: IndexMap<String, String>,
    pub content: Vec<OperationResult>,
}

/// Build the summary from the verified final state and the collected
/// register results (unregister attempts are never surfaced).
pub fn build_summary(
    geoserver: Option<&GeoserverClient>,
    hydroserver: Option<&HydroserverClient>,
    resource_id: &str,
    state: &VerifiedState,
    content: Vec<OperationResult>,
) -> ServiceSummary {
    let mut resource = IndexMap::new();

    if let Some(gs) = geoserver {
        let root = gs.service_root();
        let workspace = gs.workspace(resource_id);
        if !state.geospatial.is_empty() {
            resource.insert(
                "WMS Endpoint".to_string(),
                format!(
                    "{root}/wms?service=WMS&version=1.3.0&request=GetCapabilities&namespace={workspace}"
                ),
            );
        }
        if has_kind(state, StoreKind::Vector) {
            resource.insert(
                "WFS Endpoint".to_string(),
                format!(
                    "{root}/wfs?service=WFS&version=1.1.0&request=GetCapabilities&namespace={workspace}"
                ),
            );
        }
        if has_kind(state, StoreKind::Coverage) {
            resource.insert(
                "WCS Endpoint".to_string(),
                format!(
                    "{root}/wcs?service=WCS&version=1.1.0&request=GetCapabilities&namespace={workspace}"
                ),
            );
        }
    }

    if let Some(hs) = hydroserver {
        if !state.timeseries.is_empty() {
            resource.insert(
                "WOF Endpoint".to_string(),
                hs.network_catalog_url(resource_id),
            );
        }
    }

    ServiceSummary { resource, content }
}

fn has_kind(state: &VerifiedState, kind: StoreKind) -> bool {
    state
        .geospatial
        .iter()
        .any(|e| e.store_kind == Some(kind))
}
