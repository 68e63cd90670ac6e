//! Core data model and pure reconciliation logic for Hydrolink.
//!
//! This crate is I/O free. It defines the manifest and artifact types, the
//! URL path-segment parser that derives artifact identities, the desired-state
//! extractor, and the planner that diffs desired state against live registry
//! state. All network interaction lives in `hydrolink-registry`.

pub mod artifact;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod plan;
pub mod result;

pub use artifact::{DesiredArtifact, RegistryEntry, StoreKind};
pub use error::{CoreError, Result};
pub use extract::{DesiredState, extract_desired};
pub use manifest::{FileListing, ManifestEntry, ManifestPath};
pub use plan::{BackendPlan, ReconciliationPlan, plan};
pub use result::OperationResult;
