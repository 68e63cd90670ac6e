//! Registry inspection: read the live state of both backends.
//!
//! Read failures collapse to empty listings. Absence and unreachability are
//! indistinguishable here on purpose: a briefly unavailable registry must not
//! block provisioning of the other one. The cost is that a transient outage
//! can look like "nothing registered" and trigger re-registration later.

use hydrolink_core::{RegistryEntry, StoreKind};

use crate::geoserver::GeoserverClient;
use crate::hydroserver::HydroserverClient;

/// List the geospatial entries (both store kinds, merged) for a resource.
///
/// Each store-kind listing fails open independently; an unconfigured backend
/// reports empty without a call.
pub async fn list_geospatial(
    client: Option<&GeoserverClient>,
    resource_id: &str,
) -> Vec<RegistryEntry> {
    let Some(client) = client else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for kind in [StoreKind::Vector, StoreKind::Coverage] {
        match client.list_stores(resource_id, kind).await {
            Ok(mut stores) => entries.append(&mut stores),
            Err(e) => {
                tracing::debug!(
                    resource_id = %resource_id,
                    store_kind = ?kind,
                    error = %e,
                    "store listing failed, treating as empty"
                );
            }
        }
    }
    entries
}

/// List the time-series databases for a resource; same fail-open policy.
pub async fn list_timeseries(
    client: Option<&HydroserverClient>,
    resource_id: &str,
) -> Vec<RegistryEntry> {
    let Some(client) = client else {
        return Vec::new();
    };

    match client.list_databases(resource_id).await {
        Ok(databases) => databases,
        Err(e) => {
            tracing::debug!(
                resource_id = %resource_id,
                error = %e,
                "database listing failed, treating as empty"
            );
            Vec::new()
        }
    }
}
