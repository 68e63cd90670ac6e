//! Registry clients and the reconciliation engine.
//!
//! This crate owns every external collaborator — the manifest source, the
//! geospatial registry and the time-series registry — and the engine that
//! drives both registries toward the state a resource's manifest calls for:
//! inspect, plan, execute (with compensation), verify, summarize.

pub mod error;
pub mod executor;
pub mod geoserver;
pub mod hydroserver;
pub mod inspector;
pub mod manifest;
pub mod reconciler;
pub mod sidecar;
pub mod style;
pub mod summary;
pub mod verifier;

pub use error::RegistryError;
pub use executor::RegistrationExecutor;
pub use geoserver::GeoserverClient;
pub use hydroserver::HydroserverClient;
pub use manifest::{ManifestClient, ResourceAccess};
pub use reconciler::Reconciler;
pub use summary::ServiceSummary;
