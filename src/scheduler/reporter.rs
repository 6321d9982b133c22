//! Projects live scheduler state into a serializable status report.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::types::{
    JobDataValue, JobSnapshot, Scheduler, SchedulerSnapshot, SchedulerStatus,
    SchedulerStatusReport, TriggerSnapshot, KEY_LAST_ERROR_MESSAGE, KEY_LAST_ERROR_TIME_UTC,
    KEY_LAST_RUN_OUTPUT, KEY_LAST_RUN_SUCCESSFUL,
};

/// Queries the scheduler collaborators and assembles a fresh
/// [`SchedulerStatusReport`] on every call.
///
/// The reporter never caches and tolerates jobs or triggers disappearing
/// mid-enumeration: anything that cannot be resolved is skipped, not an
/// error.
#[derive(Clone, Default)]
pub struct JobStatusReporter {
    schedulers: Vec<Arc<dyn Scheduler>>,
}

impl JobStatusReporter {
    /// Create a reporter over the given scheduler instances.
    pub fn new(schedulers: Vec<Arc<dyn Scheduler>>) -> Self {
        Self { schedulers }
    }

    /// Create a reporter with no schedulers; `status` reports an empty map.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a point-in-time status report.
    ///
    /// A scheduler with no jobs, and a job with no triggers, are omitted
    /// entirely rather than listed empty — no triggers means the job is not
    /// actually scheduled.
    pub fn status(&self) -> SchedulerStatusReport {
        let mut schedulers = HashMap::new();

        for scheduler in &self.schedulers {
            let status = derive_status(scheduler.as_ref());
            let job_keys = scheduler.job_keys();

            if job_keys.is_empty() {
                continue;
            }

            let mut jobs = Vec::new();
            for key in job_keys {
                // The job may have been deleted since we listed its key.
                let Some(detail) = scheduler.job_detail(&key) else {
                    debug!(job = %key.name, group = %key.group, "job detail unresolvable, skipping");
                    continue;
                };

                let triggers = scheduler.triggers_of(&key);
                if triggers.is_empty() {
                    continue;
                }

                let trigger_snapshots = triggers
                    .into_iter()
                    .map(|t| TriggerSnapshot {
                        name: t.name,
                        group: t.group,
                        description: t.description,
                        last_fire_time_utc: t.previous_fire_time,
                        next_fire_time_utc: t.next_fire_time,
                        final_fire_time_utc: t.final_fire_time,
                        start_time_utc: t.start_time,
                        end_time_utc: t.end_time,
                    })
                    .collect();

                jobs.push(JobSnapshot {
                    name: key.name,
                    group: key.group,
                    description: detail.description.clone(),
                    job_class: detail.job_type_name.clone(),
                    last_run_successful: extract_last_run_successful(&detail.data),
                    last_error_time_utc: extract_last_error_time(&detail.data),
                    last_run_error_message: extract_last_error_message(&detail.data),
                    last_run_output: detail.data.get(KEY_LAST_RUN_OUTPUT).map(JobDataValue::to_json),
                    concurrent_execution_allowed: !detail.concurrent_execution_disallowed,
                    persist_job_data: detail.persist_data_after_execution,
                    triggers: trigger_snapshots,
                });
            }

            // No triggered jobs at all means there is nothing scheduled
            // here; omit the scheduler rather than listing it empty.
            if jobs.is_empty() {
                continue;
            }

            schedulers.insert(scheduler.name(), SchedulerSnapshot {
                scheduler_status: status,
                jobs,
            });
        }

        SchedulerStatusReport { schedulers }
    }
}

impl std::fmt::Debug for JobStatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStatusReporter")
            .field("schedulers", &self.schedulers.len())
            .finish()
    }
}

/// Derive the display status from the scheduler's flags, first match wins:
/// Started > Shutdown > Standby > Unknown.
fn derive_status(scheduler: &dyn Scheduler) -> SchedulerStatus {
    if scheduler.is_started() {
        SchedulerStatus::Started
    } else if scheduler.is_shutdown() {
        SchedulerStatus::Shutdown
    } else if scheduler.is_standby() {
        SchedulerStatus::Standby
    } else {
        SchedulerStatus::Unknown
    }
}

/// Surface `lastRunSuccessful` only when it is actually boolean-typed.
///
/// String-encoded booleans are deliberately ignored: parsing them would
/// promote arbitrary string metadata into a status flag.
fn extract_last_run_successful(data: &HashMap<String, JobDataValue>) -> Option<bool> {
    match data.get(KEY_LAST_RUN_SUCCESSFUL) {
        Some(JobDataValue::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Surface `lastErrorMessage` only when it is a non-blank string.
fn extract_last_error_message(data: &HashMap<String, JobDataValue>) -> Option<String> {
    match data.get(KEY_LAST_ERROR_MESSAGE) {
        Some(JobDataValue::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Surface `lastErrorTimeUtc` only when it is timestamp-typed.
fn extract_last_error_time(data: &HashMap<String, JobDataValue>) -> Option<time::OffsetDateTime> {
    match data.get(KEY_LAST_ERROR_TIME_UTC) {
        Some(JobDataValue::Timestamp(ts)) => Some(*ts),
        _ => None,
    }
}
