//! Scheduler collaborator contract and snapshot types.
//!
//! The snapshot types serialize with the PascalCase field names the status
//! endpoint has always emitted; keep them stable.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use strum::Display;
use time::OffsetDateTime;

/// Well-known job data keys read by the reporter and written by the
/// [`crate::scheduler::mark`] helpers.
pub const KEY_LAST_RUN_SUCCESSFUL: &str = "lastRunSuccessful";
/// Key holding the last error message string.
pub const KEY_LAST_ERROR_MESSAGE: &str = "lastErrorMessage";
/// Key holding the UTC time of the last failure.
pub const KEY_LAST_ERROR_TIME_UTC: &str = "lastErrorTimeUtc";
/// Key holding an arbitrary output payload from the last run.
pub const KEY_LAST_RUN_OUTPUT: &str = "lastRunOutput";

/// Identifies a job within a scheduler: name plus group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey {
    /// Job name.
    pub name: String,
    /// Job group.
    pub group: String,
}

impl JobKey {
    /// Create a job key.
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

/// A value in a job's arbitrary key-value data store.
///
/// Closed sum so the reporter can extract run metadata without reflection:
/// a typed check either matches or the field is omitted, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum JobDataValue {
    /// Boolean flag.
    Bool(bool),
    /// Plain string.
    String(String),
    /// UTC timestamp.
    Timestamp(OffsetDateTime),
    /// Arbitrary JSON payload.
    Json(Value),
}

impl JobDataValue {
    /// Convert to a JSON value for verbatim serialization.
    pub fn to_json(&self) -> Value {
        match self {
            JobDataValue::Bool(b) => Value::Bool(*b),
            JobDataValue::String(s) => Value::String(s.clone()),
            JobDataValue::Timestamp(ts) => ts
                .format(&time::format_description::well_known::Rfc3339)
                .map(Value::String)
                .unwrap_or(Value::Null),
            JobDataValue::Json(v) => v.clone(),
        }
    }
}

/// Detail of a job as reported by the scheduler.
#[derive(Debug, Clone)]
pub struct JobDetail {
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether concurrent execution of this job is disallowed.
    pub concurrent_execution_disallowed: bool,
    /// Whether the job's data store persists after execution.
    pub persist_data_after_execution: bool,
    /// Fully-qualified name of the job implementation.
    pub job_type_name: String,
    /// Arbitrary per-job key-value data.
    pub data: HashMap<String, JobDataValue>,
}

/// A trigger attached to a job.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    /// Trigger name.
    pub name: String,
    /// Trigger group.
    pub group: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the trigger last fired.
    pub previous_fire_time: Option<OffsetDateTime>,
    /// When the trigger will next fire.
    pub next_fire_time: Option<OffsetDateTime>,
    /// When the trigger will fire for the last time.
    pub final_fire_time: Option<OffsetDateTime>,
    /// When the trigger becomes effective.
    pub start_time: OffsetDateTime,
    /// When the trigger expires.
    pub end_time: Option<OffsetDateTime>,
}

/// Contract the external job scheduler exposes to the reporter.
///
/// Implementations adapt a concrete scheduler; the reporter only ever reads
/// through this trait, once per status call, with no caching. Jobs and
/// triggers may disappear between calls — return `None` / empty collections
/// and the reporter skips them.
pub trait Scheduler: Send + Sync {
    /// Scheduler instance name.
    fn name(&self) -> String;

    /// Whether the scheduler has been started.
    fn is_started(&self) -> bool;

    /// Whether the scheduler has been shut down.
    fn is_shutdown(&self) -> bool;

    /// Whether the scheduler is in standby mode.
    fn is_standby(&self) -> bool;

    /// Keys of every job across all groups.
    fn job_keys(&self) -> Vec<JobKey>;

    /// Detail for one job, or `None` if it no longer exists.
    fn job_detail(&self, key: &JobKey) -> Option<JobDetail>;

    /// Triggers currently attached to one job.
    fn triggers_of(&self, key: &JobKey) -> Vec<TriggerInfo>;
}

/// Display status of a scheduler, derived per call from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SchedulerStatus {
    /// The scheduler is running.
    Started,
    /// The scheduler has been shut down.
    Shutdown,
    /// The scheduler is paused in standby mode.
    Standby,
    /// None of the flags matched.
    Unknown,
}

/// Point-in-time projection of one trigger.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriggerSnapshot {
    /// Trigger name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Trigger group.
    #[serde(rename = "Group")]
    pub group: String,
    /// Optional description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the trigger last fired.
    #[serde(
        rename = "LastFireTimeUtc",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_fire_time_utc: Option<OffsetDateTime>,
    /// When the trigger will next fire.
    #[serde(
        rename = "NextFireTimeUtc",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_fire_time_utc: Option<OffsetDateTime>,
    /// When the trigger will fire for the last time.
    #[serde(
        rename = "FinalFireTimeUtc",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_fire_time_utc: Option<OffsetDateTime>,
    /// When the trigger becomes effective.
    #[serde(rename = "StartTimeUtc", with = "time::serde::rfc3339")]
    pub start_time_utc: OffsetDateTime,
    /// When the trigger expires.
    #[serde(
        rename = "EndTimeUtc",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time_utc: Option<OffsetDateTime>,
}

/// Point-in-time projection of one scheduled job.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobSnapshot {
    /// Job name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Job group.
    #[serde(rename = "Group")]
    pub group: String,
    /// Optional description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fully-qualified job implementation name.
    #[serde(rename = "JobClass")]
    pub job_class: String,
    /// Whether the last run succeeded; absent if the job never reported it.
    #[serde(rename = "LastRunSuccessful", skip_serializing_if = "Option::is_none")]
    pub last_run_successful: Option<bool>,
    /// UTC time of the last failure.
    #[serde(
        rename = "LastErrorTimeUtc",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_error_time_utc: Option<OffsetDateTime>,
    /// Error message from the last failed run.
    #[serde(rename = "LastRunErrorMessage", skip_serializing_if = "Option::is_none")]
    pub last_run_error_message: Option<String>,
    /// Arbitrary output payload from the last run, serialized verbatim.
    #[serde(rename = "LastRunOutput", skip_serializing_if = "Option::is_none")]
    pub last_run_output: Option<Value>,
    /// Whether concurrent execution is allowed.
    #[serde(rename = "ConcurrentExecutionAllowed")]
    pub concurrent_execution_allowed: bool,
    /// Whether job data persists after execution.
    #[serde(rename = "PersistJobData")]
    pub persist_job_data: bool,
    /// Triggers attached to the job.
    #[serde(rename = "Triggers")]
    pub triggers: Vec<TriggerSnapshot>,
}

/// Point-in-time projection of one scheduler instance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchedulerSnapshot {
    /// Derived display status.
    #[serde(rename = "SchedulerStatus")]
    pub scheduler_status: SchedulerStatus,
    /// Jobs with at least one attached trigger.
    #[serde(rename = "Jobs")]
    pub jobs: Vec<JobSnapshot>,
}

/// Full status report across all known schedulers, keyed by scheduler name.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SchedulerStatusReport {
    /// Snapshot per scheduler; schedulers with no scheduled jobs are omitted.
    #[serde(rename = "Schedulers")]
    pub schedulers: HashMap<String, SchedulerSnapshot>,
}
