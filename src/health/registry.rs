//! Concurrent health-check registry with per-probe fault isolation.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::result::{AggregateHealthStatus, HealthResult};

/// Failure raised by a health probe.
///
/// Probes return this through `?` from any `std::error::Error`; the registry
/// folds it into an unhealthy [`HealthResult`] and never propagates it.
#[derive(Debug, Clone)]
pub struct ProbeError {
    /// Short error kind, e.g. the source error's type name.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl ProbeError {
    /// Create a probe error with an explicit kind and message.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl<E: std::error::Error> From<E> for ProbeError {
    fn from(err: E) -> Self {
        let kind = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error");
        Self::new(kind, err.to_string())
    }
}

type Probe = dyn Fn() -> Result<HealthResult, ProbeError> + Send + Sync;

/// A single registered probe, wrapped for fault isolation.
struct HealthCheck {
    probe: Arc<Probe>,
}

impl HealthCheck {
    fn new(probe: Arc<Probe>) -> Self {
        Self { probe }
    }

    /// Run the probe, converting returned errors and panics into an
    /// unhealthy result.
    fn execute(&self) -> HealthResult {
        match catch_unwind(AssertUnwindSafe(|| (self.probe)())) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => HealthResult::from_failure(&err.kind, &err.message),
            Err(panic) => HealthResult::from_failure("Panic", &panic_message(panic.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Concurrent map of named health checks.
///
/// Cheaply clonable; all clones share the same underlying map. Registration
/// may happen from any thread at any time, including while a run is in
/// flight — each individual operation is atomic, no ordering is guaranteed
/// between a concurrent `register` and `run_all`.
#[derive(Clone, Default)]
pub struct HealthCheckRegistry {
    checks: Arc<DashMap<String, HealthCheck>>,
}

impl HealthCheckRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named probe, replacing any prior probe under the same
    /// name (last writer wins).
    ///
    /// Avoid the name `"healthy"`: the flattened `/health` body keys each
    /// check by name next to the aggregate `healthy` flag, and a check
    /// under that name shadows the flag.
    pub fn register<F>(&self, name: impl Into<String>, probe: F)
    where
        F: Fn() -> Result<HealthResult, ProbeError> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(check = %name, "registering health check");
        self.checks.insert(name, HealthCheck::new(Arc::new(probe)));
    }

    /// Remove every registered check.
    pub fn unregister_all(&self) {
        self.checks.clear();
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the registry has no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Execute every registered probe and aggregate the results.
    ///
    /// Each probe runs synchronously in the calling context and is isolated
    /// individually: a probe that fails or panics degrades its own entry and
    /// never aborts the remaining probes. With zero registered checks the
    /// aggregate is vacuously healthy.
    pub fn run_all(&self) -> AggregateHealthStatus {
        // Snapshot the probes first so no shard lock is held while user
        // code executes.
        let probes: Vec<(String, HealthCheck)> = self
            .checks
            .iter()
            .map(|entry| (entry.key().clone(), HealthCheck::new(entry.value().probe.clone())))
            .collect();

        let mut results = HashMap::with_capacity(probes.len());
        for (name, check) in probes {
            let result = check.execute();
            if !result.healthy {
                debug!(check = %name, "health check failed");
            }
            results.insert(name, result);
        }

        AggregateHealthStatus::new(results)
    }
}

impl std::fmt::Debug for HealthCheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheckRegistry")
            .field("checks", &self.checks.len())
            .finish()
    }
}
