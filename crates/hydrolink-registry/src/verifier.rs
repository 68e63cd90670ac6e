//! Post-execution convergence verification.

use hydrolink_core::RegistryEntry;

use crate::geoserver::GeoserverClient;
use crate::hydroserver::HydroserverClient;
use crate::inspector;

/// Registry state observed after plan execution.
#[derive(Debug, Default, Clone)]
pub struct VerifiedState {
    pub geospatial: Vec<RegistryEntry>,
    pub timeseries: Vec<RegistryEntry>,
}

/// Re-inspect both backends and eagerly tear down now-empty namespaces.
///
/// Runs whether or not execution fully succeeded: an empty namespace is a
/// leak either way. The returned state is what the response is built from.
pub async fn verify_convergence(
    geoserver: Option<&GeoserverClient>,
    hydroserver: Option<&HydroserverClient>,
    resource_id: &str,
) -> VerifiedState {
    let geospatial = inspector::list_geospatial(geoserver, resource_id).await;
    if geospatial.is_empty() {
        if let Some(gs) = geoserver {
            if let Err(e) = gs.delete_workspace(resource_id).await {
                tracing::warn!(resource_id = %resource_id, error = %e, "empty workspace teardown failed");
            }
        }
    }

    let timeseries = inspector::list_timeseries(hydroserver, resource_id).await;
    if timeseries.is_empty() {
        if let Some(hs) = hydroserver {
            if let Err(e) = hs.delete_network(resource_id).await {
                tracing::warn!(resource_id = %resource_id, error = %e, "empty network teardown failed");
            }
        }
    }

    VerifiedState {
        geospatial,
        timeseries,
    }
}
