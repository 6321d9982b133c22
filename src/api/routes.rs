//! Actuator route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{environment, health, info, quartz, ActuatorState};

/// Create a router exposing every actuator endpoint.
///
/// Merge this into the host application's router, or serve it standalone.
/// Serve with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// IP gate can see the caller's address; with the gate enabled, requests
/// whose peer address is unknown are denied.
pub fn actuator_router(state: ActuatorState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/env", get(environment))
        .route("/quartz", get(quartz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
