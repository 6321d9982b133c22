//! Job-scheduler status reporting.
//!
//! This module handles:
//! - The [`Scheduler`] collaborator contract a host adapter implements
//! - Point-in-time snapshot types serialized by the `/quartz` endpoint
//! - The status reporter projecting live scheduler state into snapshots
//! - Helpers for jobs to record their last-run outcome
//! - An in-memory mock scheduler for tests and demos

pub mod mark;
pub mod mock;
pub mod reporter;
pub mod types;

pub use mark::{mark_job_failed, mark_job_successful};
pub use mock::{MockJob, MockJobBuilder, MockScheduler};
pub use reporter::JobStatusReporter;
pub use types::{
    JobDataValue, JobDetail, JobKey, JobSnapshot, Scheduler, SchedulerSnapshot, SchedulerStatus,
    SchedulerStatusReport, TriggerInfo, TriggerSnapshot, KEY_LAST_ERROR_MESSAGE,
    KEY_LAST_ERROR_TIME_UTC, KEY_LAST_RUN_OUTPUT, KEY_LAST_RUN_SUCCESSFUL,
};
