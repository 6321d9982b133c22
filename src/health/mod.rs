//! Health-check aggregation engine.
//!
//! This module handles:
//! - Health result and aggregate status types
//! - The concurrent named-probe registry
//! - Per-probe fault isolation (a failing probe never aborts aggregation)

pub mod registry;
pub mod result;

pub use registry::{HealthCheckRegistry, ProbeError};
pub use result::{AggregateHealthStatus, HealthResult};
