//! Embeddable diagnostic "actuator" endpoints for axum applications.
//!
//! A host application mounts the actuator router to expose operational
//! data about the running process:
//!
//! - `/health` — aggregated result of every registered health check
//! - `/info` — application name and version
//! - `/env` — process and environment snapshot
//! - `/quartz` — status of jobs on attached schedulers
//!
//! All endpoints share an optional IP allowlist; callers outside it get a
//! 401 before any diagnostic work runs.
//!
//! # Example
//!
//! ```no_run
//! use axum_actuator::api::{actuator_router, ActuatorState};
//! use axum_actuator::health::HealthResult;
//!
//! let state = ActuatorState::new();
//! state.checks.register("database", || {
//!     // probe the connection pool here
//!     Ok(HealthResult::healthy())
//! });
//!
//! let app = actuator_router(state);
//! # drop(app);
//! ```
//!
//! # Modules
//!
//! - [`access`]: IP/CIDR allowlist gate
//! - [`api`]: axum handlers and router
//! - [`config`]: demo-server configuration from environment
//! - [`env`]: process/environment snapshot
//! - [`error`]: unified error types
//! - [`health`]: health-check registry and aggregation
//! - [`info`]: build name/version info
//! - [`scheduler`]: scheduler collaborator contract and status reporter

pub mod access;
pub mod api;
pub mod config;
pub mod env;
pub mod error;
pub mod health;
pub mod info;
pub mod scheduler;
pub mod utils;

pub use access::{AllowedRange, IpAllowList};
pub use api::{actuator_router, ActuatorState};
pub use config::ActuatorConfig;
pub use error::{AccessError, ActuatorError, Result};
pub use health::{AggregateHealthStatus, HealthCheckRegistry, HealthResult, ProbeError};
pub use info::BuildInfo;
pub use scheduler::{JobStatusReporter, Scheduler};
