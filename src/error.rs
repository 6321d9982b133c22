//! Unified error types for the actuator endpoints.

use thiserror::Error;

/// Unified error type for the actuator crate.
#[derive(Error, Debug)]
pub enum ActuatorError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// IP allowlist error.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// IP allowlist parsing and installation errors.
///
/// Raised synchronously from [`crate::access::IpAllowList::set_from_str`];
/// a failed call never installs a partial list.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The allowlist specification string was empty or blank.
    #[error("allowlist specification is empty")]
    EmptySpecification,

    /// A single entry failed to parse as an IP address or CIDR block.
    #[error("failed to parse IP range {entry}")]
    InvalidRange {
        /// The entry that failed to parse.
        entry: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ActuatorError>;
