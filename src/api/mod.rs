//! HTTP surface for the actuator endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::ActuatorState;
pub use routes::actuator_router;
