//! Build name/version info served by the `/info` endpoint.

use serde::Serialize;

/// Name and version of the running application.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildInfo {
    /// Application name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Application version.
    #[serde(rename = "Version")]
    pub version: String,
}

impl BuildInfo {
    /// Info for a host application with an explicit name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Info for this crate's own Cargo package. Host applications usually
    /// want [`BuildInfo::new`] with their own metadata instead.
    pub fn from_cargo() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}
