//! In-memory mock scheduler for unit testing and demos.
//!
//! This module provides a mock collaborator that can back the status
//! reporter without a real scheduler behind it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use time::OffsetDateTime;

use super::types::{JobDataValue, JobDetail, JobKey, Scheduler, TriggerInfo};

/// A job held by the mock scheduler.
#[derive(Debug, Clone)]
pub struct MockJob {
    /// Job identity.
    pub key: JobKey,
    /// Optional description.
    pub description: Option<String>,
    /// Whether concurrent execution is disallowed.
    pub concurrent_execution_disallowed: bool,
    /// Whether job data persists after execution.
    pub persist_data_after_execution: bool,
    /// Fully-qualified job implementation name.
    pub job_type_name: String,
    /// Per-job key-value data.
    pub data: HashMap<String, JobDataValue>,
    /// Attached triggers.
    pub triggers: Vec<TriggerInfo>,
    /// When set, `job_detail` returns `None` for this job even though its
    /// key is listed — simulates the race with a concurrent deletion.
    pub unresolvable: bool,
}

/// Builder for mock jobs with common patterns.
pub struct MockJobBuilder {
    job: MockJob,
}

impl MockJobBuilder {
    /// Create a builder for the given job identity and implementation name.
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        job_type_name: impl Into<String>,
    ) -> Self {
        Self {
            job: MockJob {
                key: JobKey::new(name, group),
                description: None,
                concurrent_execution_disallowed: false,
                persist_data_after_execution: false,
                job_type_name: job_type_name.into(),
                data: HashMap::new(),
                triggers: Vec::new(),
                unresolvable: false,
            },
        }
    }

    /// Set the job description.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.job.description = Some(description.into());
        self
    }

    /// Disallow concurrent execution.
    pub fn concurrent_disallowed(mut self) -> Self {
        self.job.concurrent_execution_disallowed = true;
        self
    }

    /// Persist job data after execution.
    pub fn persisting(mut self) -> Self {
        self.job.persist_data_after_execution = true;
        self
    }

    /// Put an entry into the job data map.
    pub fn data(mut self, key: impl Into<String>, value: JobDataValue) -> Self {
        self.job.data.insert(key.into(), value);
        self
    }

    /// Attach a minimal trigger with only a start time.
    pub fn trigger(
        self,
        name: impl Into<String>,
        group: impl Into<String>,
        start_time: OffsetDateTime,
    ) -> Self {
        self.trigger_full(name, group, None, None, None, None, start_time, None)
    }

    /// Attach a trigger with every fire-time field spelled out.
    #[allow(clippy::too_many_arguments)]
    pub fn trigger_full(
        mut self,
        name: impl Into<String>,
        group: impl Into<String>,
        description: Option<&str>,
        previous_fire_time: Option<OffsetDateTime>,
        next_fire_time: Option<OffsetDateTime>,
        final_fire_time: Option<OffsetDateTime>,
        start_time: OffsetDateTime,
        end_time: Option<OffsetDateTime>,
    ) -> Self {
        self.job.triggers.push(TriggerInfo {
            name: name.into(),
            group: group.into(),
            description: description.map(str::to_string),
            previous_fire_time,
            next_fire_time,
            final_fire_time,
            start_time,
            end_time,
        });
        self
    }

    /// Make `job_detail` return `None` for this job.
    pub fn unresolvable(mut self) -> Self {
        self.job.unresolvable = true;
        self
    }

    /// Build the mock job.
    pub fn build(self) -> MockJob {
        self.job
    }
}

/// Mock scheduler collaborator.
///
/// Clones share the same job store, so a handle kept by a test can mutate
/// what a reporter observes on its next call.
#[derive(Clone)]
pub struct MockScheduler {
    name: String,
    started_flag: bool,
    shutdown_flag: bool,
    standby_flag: bool,
    jobs: Arc<Mutex<Vec<MockJob>>>,
}

impl MockScheduler {
    /// Create a mock scheduler with all status flags off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started_flag: false,
            shutdown_flag: false,
            standby_flag: false,
            jobs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the started flag.
    pub fn started(mut self, started: bool) -> Self {
        self.started_flag = started;
        self
    }

    /// Set the shutdown flag.
    pub fn shutdown(mut self, shutdown: bool) -> Self {
        self.shutdown_flag = shutdown;
        self
    }

    /// Set the standby flag.
    pub fn standby(mut self, standby: bool) -> Self {
        self.standby_flag = standby;
        self
    }

    /// Add a job.
    pub fn add_job(&self, job: MockJob) {
        self.jobs.lock().unwrap().push(job);
    }

    /// Remove a job by key.
    pub fn remove_job(&self, key: &JobKey) {
        self.jobs.lock().unwrap().retain(|j| &j.key != key);
    }

    /// Mutate one job's data map in place, e.g. with the
    /// [`crate::scheduler::mark`] helpers. Returns false if the job does
    /// not exist.
    pub fn update_job_data<F>(&self, key: &JobKey, update: F) -> bool
    where
        F: FnOnce(&mut HashMap<String, JobDataValue>),
    {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.iter_mut().find(|j| &j.key == key) {
            Some(job) => {
                update(&mut job.data);
                true
            }
            None => false,
        }
    }

    /// Remove all jobs.
    pub fn clear(&self) {
        self.jobs.lock().unwrap().clear();
    }
}

impl Scheduler for MockScheduler {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_started(&self) -> bool {
        self.started_flag
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_flag
    }

    fn is_standby(&self) -> bool {
        self.standby_flag
    }

    fn job_keys(&self) -> Vec<JobKey> {
        self.jobs.lock().unwrap().iter().map(|j| j.key.clone()).collect()
    }

    fn job_detail(&self, key: &JobKey) -> Option<JobDetail> {
        let jobs = self.jobs.lock().unwrap();
        let job = jobs.iter().find(|j| &j.key == key)?;

        if job.unresolvable {
            return None;
        }

        Some(JobDetail {
            description: job.description.clone(),
            concurrent_execution_disallowed: job.concurrent_execution_disallowed,
            persist_data_after_execution: job.persist_data_after_execution,
            job_type_name: job.job_type_name.clone(),
            data: job.data.clone(),
        })
    }

    fn triggers_of(&self, key: &JobKey) -> Vec<TriggerInfo> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| &j.key == key)
            .map(|j| j.triggers.clone())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for MockScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockScheduler")
            .field("name", &self.name)
            .field("jobs", &self.jobs.lock().unwrap().len())
            .finish()
    }
}
