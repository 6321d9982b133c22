//! Process and environment snapshot served by the `/env` endpoint.

use std::collections::BTreeMap;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};
use time::OffsetDateTime;

/// Point-in-time description of the running process and its environment.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentReport {
    /// OS process id.
    #[serde(rename = "ProcessId")]
    pub process_id: u32,
    /// When the process started (UTC).
    #[serde(
        rename = "ProcessStartTime",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub process_start_time: Option<OffsetDateTime>,
    /// Seconds the process has been running.
    #[serde(rename = "ProcessUptimeSecs", skip_serializing_if = "Option::is_none")]
    pub process_uptime_secs: Option<u64>,
    /// Full command line the process was launched with.
    #[serde(rename = "CommandLine")]
    pub command_line: String,
    /// Host name.
    #[serde(rename = "Hostname")]
    pub hostname: String,
    /// Operating system name.
    #[serde(rename = "Os")]
    pub os: String,
    /// Operating system version.
    #[serde(rename = "OsVersion")]
    pub os_version: String,
    /// Environment variables visible to the process, sorted by name.
    #[serde(rename = "EnvironmentVariables")]
    pub environment_variables: BTreeMap<String, String>,
}

impl EnvironmentReport {
    /// Gather a fresh snapshot of the current process.
    pub fn capture() -> Self {
        let pid = std::process::id();

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
        let process = system.process(Pid::from_u32(pid));

        let process_start_time = process
            .map(|p| p.start_time())
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs as i64).ok());
        let process_uptime_secs = process.map(|p| p.run_time());

        let environment_variables = std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect();

        Self {
            process_id: pid,
            process_start_time,
            process_uptime_secs,
            command_line: std::env::args().collect::<Vec<_>>().join(" "),
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            os: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            environment_variables,
        }
    }
}
