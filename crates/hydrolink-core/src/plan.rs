//! Reconciliation planning: diff desired state against live registry state.

use std::collections::HashSet;

use crate::artifact::{DesiredArtifact, RegistryEntry};
use crate::extract::DesiredState;

/// Ordered operations for one backend.
///
/// Invariants: the register and unregister identity sets are disjoint, and
/// `create_namespace` is true only when the backend currently holds no
/// entries for the resource and at least one artifact is to be registered.
/// Unregister operations always execute before register operations so a
/// replaced artifact never collides with its predecessor's name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BackendPlan {
    pub register: Vec<DesiredArtifact>,
    pub unregister: Vec<RegistryEntry>,
    pub create_namespace: bool,
}

impl BackendPlan {
    pub fn is_empty(&self) -> bool {
        self.register.is_empty() && self.unregister.is_empty() && !self.create_namespace
    }
}

/// The full plan for one reconciliation pass. The geospatial backend is
/// executed to completion before the time-series backend begins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconciliationPlan {
    pub geospatial: BackendPlan,
    pub timeseries: BackendPlan,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.geospatial.is_empty() && self.timeseries.is_empty()
    }
}

/// Diff desired artifacts against live entries for both backends.
pub fn plan(
    desired: &DesiredState,
    actual_geospatial: &[RegistryEntry],
    actual_timeseries: &[RegistryEntry],
) -> ReconciliationPlan {
    ReconciliationPlan {
        geospatial: plan_backend(&desired.geospatial, actual_geospatial),
        timeseries: plan_backend(&desired.timeseries, actual_timeseries),
    }
}

fn plan_backend(desired: &[DesiredArtifact], actual: &[RegistryEntry]) -> BackendPlan {
    let desired_identities: HashSet<&str> = desired.iter().map(|a| a.identity()).collect();
    let actual_identities: HashSet<&str> = actual.iter().map(|e| e.identity.as_str()).collect();

    let register: Vec<DesiredArtifact> = desired
        .iter()
        .filter(|a| !actual_identities.contains(a.identity()))
        .cloned()
        .collect();

    let unregister: Vec<RegistryEntry> = actual
        .iter()
        .filter(|e| !desired_identities.contains(e.identity.as_str()))
        .cloned()
        .collect();

    let create_namespace = actual.is_empty() && !register.is_empty();

    BackendPlan {
        register,
        unregister,
        create_namespace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::StoreKind;

    fn raster(identity: &str) -> DesiredArtifact {
        DesiredArtifact::GeoRasterLayer {
            identity: identity.into(),
            storage_path: format!("r1/data/contents/{identity}/{identity}.tif"),
            file_stem: identity.into(),
        }
    }

    fn database(identity: &str) -> DesiredArtifact {
        DesiredArtifact::TimeSeriesDatabase {
            identity: identity.into(),
            storage_path: format!("r1/data/contents/{identity}/{identity}.sqlite"),
            title: identity.into(),
        }
    }

    fn desired(geo: Vec<DesiredArtifact>, ts: Vec<DesiredArtifact>) -> DesiredState {
        DesiredState {
            geospatial: geo,
            timeseries: ts,
        }
    }

    #[test]
    fn test_fresh_resource_registers_everything_and_creates_namespace() {
        let plan = plan(&desired(vec![raster("dem")], vec![database("odm2")]), &[], &[]);
        assert_eq!(plan.geospatial.register.len(), 1);
        assert!(plan.geospatial.unregister.is_empty());
        assert!(plan.geospatial.create_namespace);
        assert_eq!(plan.timeseries.register.len(), 1);
        assert!(plan.timeseries.create_namespace);
    }

    #[test]
    fn test_empty_desired_unregisters_all_without_namespace() {
        let actual = vec![
            RegistryEntry::geospatial("dem", StoreKind::Coverage),
            RegistryEntry::geospatial("sites", StoreKind::Vector),
        ];
        let plan = plan(&DesiredState::default(), &actual, &[]);
        assert!(plan.geospatial.register.is_empty());
        assert_eq!(plan.geospatial.unregister.len(), 2);
        assert!(!plan.geospatial.create_namespace);
        assert!(plan.timeseries.is_empty());
    }

    #[test]
    fn test_matching_state_yields_empty_plan() {
        let state = desired(vec![raster("dem")], vec![database("odm2")]);
        let actual_geo = vec![RegistryEntry::geospatial("dem", StoreKind::Coverage)];
        let actual_ts = vec![RegistryEntry::timeseries("odm2")];
        let plan = plan(&state, &actual_geo, &actual_ts);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_register_and_unregister_identity_sets_are_disjoint() {
        let state = desired(vec![raster("dem"), raster("slope")], vec![]);
        let actual = vec![
            RegistryEntry::geospatial("dem", StoreKind::Coverage),
            RegistryEntry::geospatial("aspect", StoreKind::Coverage),
        ];
        let plan = plan(&state, &actual, &[]);

        let register: Vec<&str> = plan.geospatial.register.iter().map(|a| a.identity()).collect();
        let unregister: Vec<&str> = plan
            .geospatial
            .unregister
            .iter()
            .map(|e| e.identity.as_str())
            .collect();
        assert_eq!(register, vec!["slope"]);
        assert_eq!(unregister, vec!["aspect"]);
        assert!(register.iter().all(|i| !unregister.contains(i)));
        // Namespace already exists, never recreate it.
        assert!(!plan.geospatial.create_namespace);
    }

    #[test]
    fn test_no_namespace_when_nothing_to_register() {
        // Empty registry and empty desired state: nothing to do at all.
        let plan = plan(&DesiredState::default(), &[], &[]);
        assert!(plan.is_empty());
        assert!(!plan.geospatial.create_namespace);
        assert!(!plan.timeseries.create_namespace);
    }
}
