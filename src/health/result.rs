//! Health result types.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Outcome of a single health probe.
///
/// `detail` carries whatever the probe wants to expose (connection stats,
/// versions, an error string) and is serialized verbatim as `responseData`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthResult {
    /// Whether the probe passed.
    pub healthy: bool,
    /// Arbitrary structured detail, omitted from output when absent.
    #[serde(rename = "responseData", skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl HealthResult {
    /// A passing result with no detail.
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            detail: None,
        }
    }

    /// A passing result with detail payload.
    pub fn healthy_with(detail: impl Into<Value>) -> Self {
        Self {
            healthy: true,
            detail: Some(detail.into()),
        }
    }

    /// A failing result with no detail.
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            detail: None,
        }
    }

    /// A failing result with detail payload.
    pub fn unhealthy_with(detail: impl Into<Value>) -> Self {
        Self {
            healthy: false,
            detail: Some(detail.into()),
        }
    }

    /// A failing result carrying a probe failure description,
    /// `"EXCEPTION: <kind>, <message>"`.
    pub(crate) fn from_failure(kind: &str, message: &str) -> Self {
        Self::unhealthy_with(format!("EXCEPTION: {kind}, {message}"))
    }
}

/// Aggregate of every registered check, computed fresh on each run.
#[derive(Debug, Clone)]
pub struct AggregateHealthStatus {
    /// True iff every individual result is healthy. Vacuously true when no
    /// checks are registered.
    pub healthy: bool,
    /// Result of each registered check, keyed by registration name.
    pub results: HashMap<String, HealthResult>,
}

impl AggregateHealthStatus {
    /// Build the aggregate from individual results.
    pub fn new(results: HashMap<String, HealthResult>) -> Self {
        Self {
            healthy: results.values().all(|r| r.healthy),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_serializes_as_response_data() {
        let result = HealthResult::healthy_with(json!({"connections": 4}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"healthy": true, "responseData": {"connections": 4}}));
    }

    #[test]
    fn absent_detail_is_omitted() {
        let value = serde_json::to_value(HealthResult::unhealthy()).unwrap();
        assert_eq!(value, json!({"healthy": false}));
    }

    #[test]
    fn aggregate_is_and_over_results() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), HealthResult::healthy());
        results.insert("b".to_string(), HealthResult::healthy());
        assert!(AggregateHealthStatus::new(results.clone()).healthy);

        results.insert("c".to_string(), HealthResult::unhealthy());
        assert!(!AggregateHealthStatus::new(results).healthy);
    }

    #[test]
    fn empty_aggregate_is_vacuously_healthy() {
        let status = AggregateHealthStatus::new(HashMap::new());
        assert!(status.healthy);
        assert!(status.results.is_empty());
    }

    #[test]
    fn failure_detail_is_prefixed() {
        let result = HealthResult::from_failure("Timeout", "probe timed out");
        assert_eq!(
            result.detail,
            Some(json!("EXCEPTION: Timeout, probe timed out"))
        );
    }
}
