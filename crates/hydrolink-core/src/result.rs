//! Per-artifact registration outcomes surfaced to the caller.

use serde::Serialize;

/// Outcome of one register attempt.
///
/// Unregister attempts never produce results; only register attempts are
/// surfaced. On success `message` carries the artifact's access URL, on
/// failure a human-readable reason. Field names are part of the endpoint's
/// wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "layer_name")]
    pub identity: String,
    pub message: String,
}

impl OperationResult {
    /// A successful registration with its access URL.
    pub fn registered(
        kind: &'static str,
        identity: impl Into<String>,
        access_url: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            kind,
            identity: identity.into(),
            message: access_url.into(),
        }
    }

    /// A failed registration with a human-readable reason.
    pub fn failed(
        kind: &'static str,
        identity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            kind,
            identity: identity.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let result = OperationResult::registered(
            "GeographicRaster",
            "dem",
            "https://geo.example.org/wms?layers=dem",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["type"], "GeographicRaster");
        assert_eq!(json["layer_name"], "dem");
        assert!(json["message"].as_str().unwrap().contains("wms"));
    }

    #[test]
    fn test_failure_result() {
        let result = OperationResult::failed("Timeseries", "odm2", "Error: no database");
        assert!(!result.success);
        assert_eq!(result.identity, "odm2");
    }
}
