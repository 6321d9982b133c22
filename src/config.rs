//! Demo-server configuration loaded from environment variables.

use serde::Deserialize;

/// Configuration for the standalone actuator demo server.
#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorConfig {
    /// HTTP server port for the actuator endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Comma-separated IPs/CIDRs allowed to call the endpoints.
    /// Empty means no restriction.
    #[serde(default)]
    pub actuator_allowed_ips: Option<String>,

    /// Enforce the IP allowlist on every endpoint.
    #[serde(default)]
    pub ip_allow_list_enabled: bool,

    /// Application name reported by `/info` (defaults to the crate name).
    #[serde(default)]
    pub app_name: Option<String>,

    /// Application version reported by `/info` (defaults to the crate
    /// version).
    #[serde(default)]
    pub app_version: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ActuatorConfig {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.ip_allow_list_enabled {
            let spec = self
                .actuator_allowed_ips
                .as_deref()
                .unwrap_or("")
                .trim();
            if spec.is_empty() {
                return Err(
                    "IP_ALLOW_LIST_ENABLED requires ACTUATOR_ALLOWED_IPS to be set".to_string()
                );
            }

            for entry in spec.split(',') {
                if entry.trim().parse::<crate::access::AllowedRange>().is_err() {
                    return Err(format!("ACTUATOR_ALLOWED_IPS entry {entry:?} is invalid"));
                }
            }
        }

        Ok(())
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            actuator_allowed_ips: None,
            ip_allow_list_enabled: false,
            app_name: None,
            app_version: None,
            rust_log: default_log_level(),
        }
    }
}
