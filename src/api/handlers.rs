//! HTTP handlers for the actuator endpoints.
//!
//! Every handler evaluates the IP-allowlist gate before doing any work;
//! a denied caller gets a 401 without a single probe or scheduler query
//! executing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::access::IpAllowList;
use crate::env::EnvironmentReport;
use crate::health::HealthCheckRegistry;
use crate::info::BuildInfo;
use crate::scheduler::{JobStatusReporter, Scheduler};

/// Shared state behind every actuator endpoint.
///
/// Clones share the same registry and allowlist; the host registers checks
/// and configures the gate through any handle.
#[derive(Debug, Clone)]
pub struct ActuatorState {
    /// Health-check registry.
    pub checks: HealthCheckRegistry,
    /// IP allowlist shared by all endpoints.
    pub allow_list: IpAllowList,
    /// Scheduler status reporter.
    pub reporter: JobStatusReporter,
    /// Name/version served by `/info`.
    pub info: BuildInfo,
    /// Whether the allowlist gate is enforced.
    pub ip_allow_list_enabled: bool,
}

impl ActuatorState {
    /// Create state with an empty registry, an open gate, and no schedulers.
    pub fn new() -> Self {
        Self {
            checks: HealthCheckRegistry::new(),
            allow_list: IpAllowList::new(),
            reporter: JobStatusReporter::empty(),
            info: BuildInfo::from_cargo(),
            ip_allow_list_enabled: false,
        }
    }

    /// Set the `/info` payload.
    pub fn with_info(mut self, info: BuildInfo) -> Self {
        self.info = info;
        self
    }

    /// Attach scheduler collaborators for the `/quartz` endpoint.
    pub fn with_schedulers(mut self, schedulers: Vec<Arc<dyn Scheduler>>) -> Self {
        self.reporter = JobStatusReporter::new(schedulers);
        self
    }

    /// Enable or disable allowlist enforcement.
    pub fn with_ip_allow_list(mut self, enabled: bool) -> Self {
        self.ip_allow_list_enabled = enabled;
        self
    }
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Body returned to callers outside the allowlist.
#[derive(Debug, Serialize)]
struct ForbiddenResponse {
    message: &'static str,
}

/// Evaluate the gate. Returns the 401 response to send when enforcement is
/// on and the caller is not allowed.
///
/// With enforcement on, an unknown peer address is denied: the list cannot
/// be checked without one, and that happens when the router is served
/// without `into_make_service_with_connect_info`.
fn check_gate(state: &ActuatorState, addr: Option<&SocketAddr>) -> Option<Response> {
    if !state.ip_allow_list_enabled {
        return None;
    }

    let Some(addr) = addr else {
        warn!("actuator request denied: remote address unknown, cannot check allowlist");
        return Some(forbidden());
    };

    if state.allow_list.is_allowed(addr.ip()) {
        return None;
    }

    warn!(remote = %addr, "actuator request denied by IP allowlist");
    Some(forbidden())
}

fn forbidden() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ForbiddenResponse { message: "Forbidden" }),
    )
        .into_response()
}

/// `GET /health` — run every registered check and aggregate.
///
/// 200 when all checks pass, 503 when any fails; the body carries each
/// check's result keyed by its registration name alongside the overall
/// `healthy` flag.
pub async fn health(
    State(state): State<ActuatorState>,
    addr: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    if let Some(denied) = check_gate(&state, addr.as_ref().map(|a| &a.0)) {
        return denied;
    }

    let checks = state.checks.clone();
    let status = match tokio::task::spawn_blocking(move || checks.run_all()).await {
        Ok(status) => status,
        Err(err) => {
            warn!(error = %err, "health check execution task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    // Flatten into {"healthy": ..., "<name>": {...}, ...}.
    let mut body = Map::new();
    body.insert("healthy".to_string(), Value::Bool(status.healthy));
    for (name, result) in status.results {
        match serde_json::to_value(&result) {
            Ok(value) => {
                body.insert(name, value);
            }
            Err(err) => {
                warn!(check = %name, error = %err, "failed to serialize health result");
            }
        }
    }

    (code, Json(Value::Object(body))).into_response()
}

/// `GET /info` — application name and version.
pub async fn info(
    State(state): State<ActuatorState>,
    addr: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    if let Some(denied) = check_gate(&state, addr.as_ref().map(|a| &a.0)) {
        return denied;
    }

    Json(state.info.clone()).into_response()
}

/// `GET /env` — process and environment snapshot.
pub async fn environment(
    State(state): State<ActuatorState>,
    addr: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    if let Some(denied) = check_gate(&state, addr.as_ref().map(|a| &a.0)) {
        return denied;
    }

    match tokio::task::spawn_blocking(EnvironmentReport::capture).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            warn!(error = %err, "environment capture task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /quartz` — scheduler status report.
pub async fn quartz(
    State(state): State<ActuatorState>,
    addr: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    if let Some(denied) = check_gate(&state, addr.as_ref().map(|a| &a.0)) {
        return denied;
    }

    let reporter = state.reporter.clone();
    match tokio::task::spawn_blocking(move || reporter.status()).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            warn!(error = %err, "scheduler status task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn gate_is_open_when_disabled() {
        let state = ActuatorState::new();
        state.allow_list.set_from_str("10.0.0.0/8").unwrap();

        // Enforcement off: even a non-allowed address passes.
        assert!(check_gate(&state, Some(&addr("192.168.1.1:5000"))).is_none());
    }

    #[test]
    fn gate_denies_outside_address() {
        let state = ActuatorState::new().with_ip_allow_list(true);
        state.allow_list.set_from_str("10.0.0.0/8").unwrap();

        assert!(check_gate(&state, Some(&addr("192.168.1.1:5000"))).is_some());
        assert!(check_gate(&state, Some(&addr("10.1.2.3:5000"))).is_none());
    }

    #[test]
    fn gate_denies_when_remote_address_unknown() {
        let state = ActuatorState::new().with_ip_allow_list(true);
        state.allow_list.set_from_str("10.0.0.0/8").unwrap();

        // Enforcement without a peer address fails closed.
        assert!(check_gate(&state, None).is_some());
    }

    #[test]
    fn unknown_address_passes_when_enforcement_is_off() {
        let state = ActuatorState::new();
        assert!(check_gate(&state, None).is_none());
    }

    #[test]
    fn gate_is_open_with_empty_list() {
        let state = ActuatorState::new().with_ip_allow_list(true);
        assert!(check_gate(&state, Some(&addr("192.168.1.1:5000"))).is_none());
    }
}
