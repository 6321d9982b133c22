//! Helpers for jobs to record their execution outcome.
//!
//! Jobs that want the status endpoint to show their last-run result write
//! the well-known keys into their data map at the end of each run; these
//! helpers write them consistently.

use std::collections::HashMap;

use serde_json::Value;
use time::OffsetDateTime;

use super::types::{
    JobDataValue, KEY_LAST_ERROR_MESSAGE, KEY_LAST_ERROR_TIME_UTC, KEY_LAST_RUN_OUTPUT,
    KEY_LAST_RUN_SUCCESSFUL,
};

/// Mark the job's last run as failed.
///
/// Sets `lastRunSuccessful` to false and `lastErrorTimeUtc` to the current
/// UTC time. A non-blank `error_message` is stored under `lastErrorMessage`;
/// an `output` payload is stored verbatim under `lastRunOutput`.
pub fn mark_job_failed(
    data: &mut HashMap<String, JobDataValue>,
    error_message: Option<&str>,
    output: Option<Value>,
) {
    data.insert(KEY_LAST_RUN_SUCCESSFUL.to_string(), JobDataValue::Bool(false));
    data.insert(
        KEY_LAST_ERROR_TIME_UTC.to_string(),
        JobDataValue::Timestamp(OffsetDateTime::now_utc()),
    );

    // Same non-blank rule the reporter applies on read, so nothing is
    // stored that would never be surfaced.
    if let Some(message) = error_message.filter(|m| !m.trim().is_empty()) {
        data.insert(
            KEY_LAST_ERROR_MESSAGE.to_string(),
            JobDataValue::String(message.to_string()),
        );
    }

    if let Some(output) = output {
        data.insert(KEY_LAST_RUN_OUTPUT.to_string(), JobDataValue::Json(output));
    }
}

/// Mark the job's last run as successful.
///
/// Sets `lastRunSuccessful` to true; an `output` payload is stored verbatim
/// under `lastRunOutput`.
pub fn mark_job_successful(data: &mut HashMap<String, JobDataValue>, output: Option<Value>) {
    data.insert(KEY_LAST_RUN_SUCCESSFUL.to_string(), JobDataValue::Bool(true));

    if let Some(output) = output {
        data.insert(KEY_LAST_RUN_OUTPUT.to_string(), JobDataValue::Json(output));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mark_failed_sets_flag_and_error_time() {
        let mut data = HashMap::new();
        mark_job_failed(&mut data, Some("import blew up"), None);

        assert_eq!(data.get(KEY_LAST_RUN_SUCCESSFUL), Some(&JobDataValue::Bool(false)));
        assert!(matches!(
            data.get(KEY_LAST_ERROR_TIME_UTC),
            Some(JobDataValue::Timestamp(_))
        ));
        assert_eq!(
            data.get(KEY_LAST_ERROR_MESSAGE),
            Some(&JobDataValue::String("import blew up".to_string()))
        );
        assert!(!data.contains_key(KEY_LAST_RUN_OUTPUT));
    }

    #[test]
    fn mark_failed_without_message_omits_it() {
        let mut data = HashMap::new();
        mark_job_failed(&mut data, None, None);
        assert!(!data.contains_key(KEY_LAST_ERROR_MESSAGE));

        mark_job_failed(&mut data, Some(""), None);
        assert!(!data.contains_key(KEY_LAST_ERROR_MESSAGE));

        mark_job_failed(&mut data, Some("   "), None);
        assert!(!data.contains_key(KEY_LAST_ERROR_MESSAGE));
    }

    #[test]
    fn mark_successful_sets_flag_and_output() {
        let mut data = HashMap::new();
        mark_job_successful(&mut data, Some(json!({"imported": 120})));

        assert_eq!(data.get(KEY_LAST_RUN_SUCCESSFUL), Some(&JobDataValue::Bool(true)));
        assert_eq!(
            data.get(KEY_LAST_RUN_OUTPUT),
            Some(&JobDataValue::Json(json!({"imported": 120})))
        );
    }

    #[test]
    fn success_after_failure_overwrites_the_flag() {
        let mut data = HashMap::new();
        mark_job_failed(&mut data, Some("transient"), None);
        mark_job_successful(&mut data, None);

        assert_eq!(data.get(KEY_LAST_RUN_SUCCESSFUL), Some(&JobDataValue::Bool(true)));
        // Error details from the previous run remain until the job clears
        // them; the reporter surfaces them alongside the success flag.
        assert!(data.contains_key(KEY_LAST_ERROR_MESSAGE));
    }
}
