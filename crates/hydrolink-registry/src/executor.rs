//! Plan execution: multi-step registration workflows with compensation.
//!
//! Each register attempt runs as a short-circuiting sequence of steps; the
//! first failing step produces the artifact's failure result and a
//! compensating unregister so no half-registered store outlives the attempt.
//! Unregister and namespace writes are logged but never surfaced: the
//! follow-up inspection decides what actually converged.

use hydrolink_core::{DesiredArtifact, OperationResult, ReconciliationPlan, StoreKind};

use crate::geoserver::{GeoserverClient, NativeBoundingBox};
use crate::hydroserver::HydroserverClient;
use crate::manifest::ManifestClient;
use crate::sidecar;
use crate::style;

const GEO_REGISTER_ERROR: &str = "Error: Unable to register GeoServer layer.";
const SIDECAR_ERROR: &str = "Error: Unable to parse VRT file.";
const TIMESERIES_REGISTER_ERROR: &str = "Error: Unable to register Water Data Server database.";

/// Characters the geospatial registry's naming rules cannot represent.
const DISALLOWED_IDENTITY_CHARS: [char; 2] = ['.', ','];

/// Executes a reconciliation plan against both backends.
pub struct RegistrationExecutor<'a> {
    geoserver: Option<&'a GeoserverClient>,
    hydroserver: Option<&'a HydroserverClient>,
    manifest: &'a ManifestClient,
}

impl<'a> RegistrationExecutor<'a> {
    pub fn new(
        geoserver: Option<&'a GeoserverClient>,
        hydroserver: Option<&'a HydroserverClient>,
        manifest: &'a ManifestClient,
    ) -> Self {
        Self {
            geoserver,
            hydroserver,
            manifest,
        }
    }

    /// Execute the plan: the geospatial backend runs to completion before the
    /// time-series backend begins, and within each backend every unregister
    /// precedes any register. Returns the register results in registration
    /// order, geospatial first.
    pub async fn apply(
        &self,
        resource_id: &str,
        plan: &ReconciliationPlan,
    ) -> Vec<OperationResult> {
        let mut results = Vec::new();

        if let Some(gs) = self.geoserver {
            if plan.geospatial.create_namespace {
                self.provision_workspace(gs, resource_id).await;
            }
            for entry in &plan.geospatial.unregister {
                let Some(kind) = entry.store_kind else {
                    continue;
                };
                if let Err(e) = gs.delete_store(resource_id, kind, &entry.identity).await {
                    tracing::warn!(
                        resource_id = %resource_id,
                        identity = %entry.identity,
                        error = %e,
                        "store unregister failed"
                    );
                }
            }
            for artifact in &plan.geospatial.register {
                let result = self.register_geospatial(gs, resource_id, artifact).await;
                if !result.success {
                    self.compensate_geospatial(gs, resource_id, artifact).await;
                }
                results.push(result);
            }
        }

        if let Some(hs) = self.hydroserver {
            if plan.timeseries.create_namespace {
                self.provision_network(hs, resource_id).await;
            }
            for entry in &plan.timeseries.unregister {
                if let Err(e) = hs.delete_database(resource_id, &entry.identity).await {
                    tracing::warn!(
                        resource_id = %resource_id,
                        identity = %entry.identity,
                        error = %e,
                        "database unregister failed"
                    );
                }
            }
            for artifact in &plan.timeseries.register {
                let result = self.register_timeseries(hs, resource_id, artifact).await;
                if !result.success {
                    if let Err(e) = hs.delete_database(resource_id, artifact.identity()).await {
                        tracing::warn!(
                            resource_id = %resource_id,
                            identity = %artifact.identity(),
                            error = %e,
                            "compensating database unregister failed"
                        );
                    }
                }
                results.push(result);
            }
        }

        results
    }

    /// Tear down both namespaces outright (the inaccessible-resource path).
    pub async fn teardown_all(&self, resource_id: &str) {
        if let Some(gs) = self.geoserver {
            if let Err(e) = gs.delete_workspace(resource_id).await {
                tracing::warn!(resource_id = %resource_id, error = %e, "workspace teardown failed");
            }
        }
        if let Some(hs) = self.hydroserver {
            if let Err(e) = hs.delete_network(resource_id).await {
                tracing::warn!(resource_id = %resource_id, error = %e, "network teardown failed");
            }
        }
    }

    /// Workspace creation is destructive-idempotent: any existing workspace
    /// of the same name is torn down first, so a previously half-built
    /// namespace cannot block a fresh rebuild.
    async fn provision_workspace(&self, gs: &GeoserverClient, resource_id: &str) {
        if let Err(e) = gs.delete_workspace(resource_id).await {
            tracing::debug!(resource_id = %resource_id, error = %e, "pre-create workspace delete failed");
        }
        if let Err(e) = gs.create_workspace(resource_id).await {
            tracing::warn!(resource_id = %resource_id, error = %e, "workspace creation failed");
        }
    }

    async fn provision_network(&self, hs: &HydroserverClient, resource_id: &str) {
        if let Err(e) = hs.delete_network(resource_id).await {
            tracing::debug!(resource_id = %resource_id, error = %e, "pre-create network delete failed");
        }
        if let Err(e) = hs.create_network(resource_id).await {
            tracing::warn!(resource_id = %resource_id, error = %e, "network creation failed");
        }
    }

    async fn compensate_geospatial(
        &self,
        gs: &GeoserverClient,
        resource_id: &str,
        artifact: &DesiredArtifact,
    ) {
        let Some(kind) = artifact.store_kind() else {
            return;
        };
        if let Err(e) = gs.delete_store(resource_id, kind, artifact.identity()).await {
            tracing::warn!(
                resource_id = %resource_id,
                identity = %artifact.identity(),
                error = %e,
                "compensating store unregister failed"
            );
        }
    }

    async fn register_geospatial(
        &self,
        gs: &GeoserverClient,
        resource_id: &str,
        artifact: &DesiredArtifact,
    ) -> OperationResult {
        match self.geospatial_workflow(gs, resource_id, artifact).await {
            Ok(access_url) => {
                tracing::info!(
                    resource_id = %resource_id,
                    identity = %artifact.identity(),
                    kind = artifact.kind(),
                    "layer registered"
                );
                OperationResult::registered(artifact.kind(), artifact.identity(), access_url)
            }
            Err(message) => {
                tracing::warn!(
                    resource_id = %resource_id,
                    identity = %artifact.identity(),
                    kind = artifact.kind(),
                    reason = %message,
                    "layer registration failed"
                );
                OperationResult::failed(artifact.kind(), artifact.identity(), message)
            }
        }
    }

    /// The per-layer registration steps. Any error short-circuits the
    /// workflow; the caller compensates.
    async fn geospatial_workflow(
        &self,
        gs: &GeoserverClient,
        resource_id: &str,
        artifact: &DesiredArtifact,
    ) -> Result<String, String> {
        let (kind, file_stem) = match artifact {
            DesiredArtifact::GeoRasterLayer { file_stem, .. } => (StoreKind::Coverage, file_stem),
            DesiredArtifact::GeoVectorLayer { file_stem, .. } => (StoreKind::Vector, file_stem),
            DesiredArtifact::TimeSeriesDatabase { .. } => {
                return Err(GEO_REGISTER_ERROR.to_string());
            }
        };
        let identity = artifact.identity();

        if identity.contains(DISALLOWED_IDENTITY_CHARS) {
            return Err(GEO_REGISTER_ERROR.to_string());
        }

        gs.register_external_store(resource_id, kind, identity, artifact.storage_path())
            .await
            .map_err(|e| workflow_failure(e, GEO_REGISTER_ERROR))?;

        let mut descriptor = gs
            .fetch_store_descriptor(resource_id, kind, identity, file_stem)
            .await
            .map_err(|e| workflow_failure(e, GEO_REGISTER_ERROR))?;

        let body = descriptor
            .get_mut(kind.descriptor_key())
            .ok_or_else(|| GEO_REGISTER_ERROR.to_string())?;
        if body.get("enabled").and_then(serde_json::Value::as_bool) != Some(true) {
            return Err(GEO_REGISTER_ERROR.to_string());
        }
        let bbox: NativeBoundingBox = body
            .get("nativeBoundingBox")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .ok_or_else(|| GEO_REGISTER_ERROR.to_string())?;

        // The registry names the store after the backing file; rename it to
        // the identity so replacements under the same folder keep addressing
        // the same layer.
        body["name"] = serde_json::Value::String(identity.to_string());
        gs.put_store_descriptor(resource_id, kind, identity, file_stem, &descriptor)
            .await
            .map_err(|e| workflow_failure(e, GEO_REGISTER_ERROR))?;

        if matches!(artifact, DesiredArtifact::GeoRasterLayer { .. }) {
            self.style_raster(gs, resource_id, identity, artifact.storage_path())
                .await?;
        }

        Ok(self.wms_access_url(gs, resource_id, identity, &bbox))
    }

    /// Raster-only styling steps. A failure here is terminal for the artifact
    /// even though the store registration already succeeded; the orphaned
    /// unstyled store is a known inconsistency of the workflow.
    async fn style_raster(
        &self,
        gs: &GeoserverClient,
        resource_id: &str,
        identity: &str,
        storage_path: &str,
    ) -> Result<(), String> {
        let xml = self
            .manifest
            .fetch_sidecar(storage_path)
            .await
            .map_err(|e| workflow_failure(e, SIDECAR_ERROR))?;
        let stats = sidecar::parse_raster_stats(&xml).map_err(|reason| {
            tracing::debug!(identity = %identity, reason = %reason, "sidecar rejected");
            SIDECAR_ERROR.to_string()
        })?;

        gs.create_style(resource_id, style::layer_style(stats, identity))
            .await
            .map_err(|e| workflow_failure(e, SIDECAR_ERROR))?;
        gs.set_default_style(resource_id, identity)
            .await
            .map_err(|e| workflow_failure(e, SIDECAR_ERROR))?;
        Ok(())
    }

    fn wms_access_url(
        &self,
        gs: &GeoserverClient,
        resource_id: &str,
        identity: &str,
        bbox: &NativeBoundingBox,
    ) -> String {
        let workspace = gs.workspace(resource_id);
        format!(
            "{root}/{workspace}/wms?service=WMS&version=1.1.0&request=GetMap\
             &layers={workspace}:{layer}\
             &bbox={minx}%2C{miny}%2C{maxx}%2C{maxy}\
             &width=612&height=768&srs={crs}&format=application/openlayers",
            root = gs.service_root(),
            workspace = workspace,
            layer = urlencoding::encode(identity),
            minx = bbox.minx,
            miny = bbox.miny,
            maxx = bbox.maxx,
            maxy = bbox.maxy,
            crs = bbox.crs_code(),
        )
    }

    async fn register_timeseries(
        &self,
        hs: &HydroserverClient,
        resource_id: &str,
        artifact: &DesiredArtifact,
    ) -> OperationResult {
        let DesiredArtifact::TimeSeriesDatabase {
            identity,
            storage_path,
            title,
        } = artifact
        else {
            return OperationResult::failed(
                artifact.kind(),
                artifact.identity(),
                TIMESERIES_REGISTER_ERROR,
            );
        };

        match hs
            .create_database(resource_id, identity, title, storage_path)
            .await
        {
            Ok(()) => {
                tracing::info!(resource_id = %resource_id, identity = %identity, "database registered");
                OperationResult::registered(
                    artifact.kind(),
                    identity,
                    hs.database_catalog_url(resource_id, identity),
                )
            }
            Err(e) => {
                tracing::warn!(
                    resource_id = %resource_id,
                    identity = %identity,
                    error = %e,
                    "database registration failed"
                );
                OperationResult::failed(artifact.kind(), identity, TIMESERIES_REGISTER_ERROR)
            }
        }
    }
}

fn workflow_failure(error: crate::error::RegistryError, message: &str) -> String {
    tracing::debug!(error = %error, "registration step failed");
    message.to_string()
}
