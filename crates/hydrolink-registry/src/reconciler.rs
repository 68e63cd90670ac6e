//! The per-invocation reconciliation state machine.

use hydrolink_config::AppConfig;
use hydrolink_core::{extract_desired, plan};

use crate::error::Result;
use crate::executor::RegistrationExecutor;
use crate::geoserver::GeoserverClient;
use crate::hydroserver::HydroserverClient;
use crate::inspector;
use crate::manifest::{ManifestClient, ResourceAccess};
use crate::summary::{ServiceSummary, build_summary};
use crate::verifier::verify_convergence;

/// Reconciles one resource per call: manifest check, inspect, plan, execute,
/// verify, summarize. Holds the three collaborator clients; everything else
/// is created fresh per invocation, so the registries themselves are the only
/// durable state.
#[derive(Debug, Clone)]
pub struct Reconciler {
    manifest: ManifestClient,
    geoserver: Option<GeoserverClient>,
    hydroserver: Option<HydroserverClient>,
}

impl Reconciler {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        Ok(Self {
            manifest: ManifestClient::new(&cfg.manifest)?,
            geoserver: GeoserverClient::from_config(&cfg.geospatial)?,
            hydroserver: HydroserverClient::from_config(&cfg.timeseries)?,
        })
    }

    /// Drive both registries toward the state the resource's manifest calls
    /// for. Every failure path resolves to a structured summary; this never
    /// errors.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self, resource_id: &str) -> ServiceSummary {
        let geoserver = self.geoserver.as_ref();
        let hydroserver = self.hydroserver.as_ref();
        let executor = RegistrationExecutor::new(geoserver, hydroserver, &self.manifest);

        let entries = match self.manifest.file_list(resource_id).await {
            ResourceAccess::Private => {
                tracing::info!(resource_id = %resource_id, "resource inaccessible, tearing down");
                executor.teardown_all(resource_id).await;
                return ServiceSummary::default();
            }
            ResourceAccess::Public(entries) => entries,
        };

        let desired = extract_desired(&entries, geoserver.is_some(), hydroserver.is_some());
        let actual_geospatial = inspector::list_geospatial(geoserver, resource_id).await;
        let actual_timeseries = inspector::list_timeseries(hydroserver, resource_id).await;

        let plan = plan(&desired, &actual_geospatial, &actual_timeseries);
        tracing::debug!(
            resource_id = %resource_id,
            geo_register = plan.geospatial.register.len(),
            geo_unregister = plan.geospatial.unregister.len(),
            ts_register = plan.timeseries.register.len(),
            ts_unregister = plan.timeseries.unregister.len(),
            "reconciliation planned"
        );

        let results = executor.apply(resource_id, &plan).await;

        let verified = verify_convergence(geoserver, hydroserver, resource_id).await;

        build_summary(geoserver, hydroserver, resource_id, &verified, results)
    }
}
