//! End-to-end tests driving the actuator endpoints through the router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use time::macros::datetime;
use tower::ServiceExt;

use axum_actuator::api::{actuator_router, ActuatorState};
use axum_actuator::health::{HealthResult, ProbeError};
use axum_actuator::info::BuildInfo;
use axum_actuator::scheduler::{
    mark_job_failed, mark_job_successful, JobDataValue, JobKey, MockJobBuilder, MockScheduler,
    KEY_LAST_RUN_SUCCESSFUL,
};

fn request_from(uri: &str, remote: &str) -> Request<Body> {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let addr: SocketAddr = remote.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(request_from(uri, "127.0.0.1:9999"))
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_aggregates_mixed_results() {
    let state = ActuatorState::new();
    state.checks.register("database", || Ok(HealthResult::healthy()));
    state.checks.register("smtp", || {
        Ok(HealthResult::unhealthy_with(json!({"error": "connect timeout"})))
    });
    state
        .checks
        .register("broken", || Err(ProbeError::new("IoError", "socket closed")));

    let (status, body) = get_json(actuator_router(state), "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["healthy"], json!(false));
    assert_eq!(body["database"], json!({"healthy": true}));
    assert_eq!(
        body["smtp"],
        json!({"healthy": false, "responseData": {"error": "connect timeout"}})
    );
    assert_eq!(
        body["broken"],
        json!({"healthy": false, "responseData": "EXCEPTION: IoError, socket closed"})
    );
}

#[tokio::test]
async fn health_recovers_after_unregister_all() {
    let state = ActuatorState::new();
    state.checks.register("x", || Ok(HealthResult::unhealthy()));

    let (status, _) = get_json(actuator_router(state.clone()), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    state.checks.unregister_all();

    let (status, body) = get_json(actuator_router(state), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"healthy": true}));
}

#[tokio::test]
async fn info_serves_host_metadata() {
    let state = ActuatorState::new().with_info(BuildInfo::new("billing-service", "3.4.0"));

    let (status, body) = get_json(actuator_router(state), "/info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Name": "billing-service", "Version": "3.4.0"}));
}

#[tokio::test]
async fn env_reports_registered_variable() {
    std::env::set_var("ACTUATOR_INTEGRATION_MARKER", "present");
    let (status, body) = get_json(actuator_router(ActuatorState::new()), "/env").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["EnvironmentVariables"]["ACTUATOR_INTEGRATION_MARKER"],
        json!("present")
    );
    assert_eq!(body["ProcessId"], json!(std::process::id()));
}

#[tokio::test]
async fn quartz_reports_full_job_shape() {
    let scheduler = MockScheduler::new("main-scheduler").started(true);
    scheduler.add_job(
        MockJobBuilder::new("import", "etl", "jobs::ImportJob")
            .described("nightly data import")
            .concurrent_disallowed()
            .data(KEY_LAST_RUN_SUCCESSFUL, JobDataValue::Bool(true))
            .trigger_full(
                "import-trigger",
                "etl",
                Some("daily at 02:00"),
                Some(datetime!(2024-06-01 02:00:00 UTC)),
                Some(datetime!(2024-06-02 02:00:00 UTC)),
                None,
                datetime!(2024-01-01 00:00:00 UTC),
                None,
            )
            .build(),
    );

    let state = ActuatorState::new().with_schedulers(vec![Arc::new(scheduler)]);
    let (status, body) = get_json(actuator_router(state), "/quartz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Schedulers": {
                "main-scheduler": {
                    "SchedulerStatus": "STARTED",
                    "Jobs": [{
                        "Name": "import",
                        "Group": "etl",
                        "Description": "nightly data import",
                        "JobClass": "jobs::ImportJob",
                        "LastRunSuccessful": true,
                        "ConcurrentExecutionAllowed": false,
                        "PersistJobData": false,
                        "Triggers": [{
                            "Name": "import-trigger",
                            "Group": "etl",
                            "Description": "daily at 02:00",
                            "LastFireTimeUtc": "2024-06-01T02:00:00Z",
                            "NextFireTimeUtc": "2024-06-02T02:00:00Z",
                            "StartTimeUtc": "2024-01-01T00:00:00Z",
                        }],
                    }],
                },
            },
        })
    );
}

#[tokio::test]
async fn quartz_omits_scheduler_without_scheduled_jobs() {
    let quiet = MockScheduler::new("quiet").started(true);
    quiet.add_job(MockJobBuilder::new("untriggered", "default", "jobs::Idle").build());

    let active = MockScheduler::new("active").standby(true);
    active.add_job(
        MockJobBuilder::new("job", "default", "jobs::Busy")
            .trigger("t", "default", datetime!(2024-01-01 00:00:00 UTC))
            .build(),
    );

    let state =
        ActuatorState::new().with_schedulers(vec![Arc::new(quiet), Arc::new(active)]);
    let (_, body) = get_json(actuator_router(state), "/quartz").await;

    let schedulers = body["Schedulers"].as_object().unwrap();
    assert_eq!(schedulers.len(), 1);
    assert_eq!(body["Schedulers"]["active"]["SchedulerStatus"], json!("STANDBY"));
}

#[tokio::test]
async fn quartz_reflects_job_marker_updates() {
    let scheduler = MockScheduler::new("s").started(true);
    let key = JobKey::new("job", "default");
    scheduler.add_job(
        MockJobBuilder::new("job", "default", "jobs::Flaky")
            .trigger("t", "default", datetime!(2024-01-01 00:00:00 UTC))
            .build(),
    );

    let state =
        ActuatorState::new().with_schedulers(vec![Arc::new(scheduler.clone())]);
    let app = actuator_router(state);

    scheduler.update_job_data(&key, |data| {
        mark_job_failed(data, Some("upstream 502"), None);
    });

    let (_, body) = get_json(app.clone(), "/quartz").await;
    let job = &body["Schedulers"]["s"]["Jobs"][0];
    assert_eq!(job["LastRunSuccessful"], json!(false));
    assert_eq!(job["LastRunErrorMessage"], json!("upstream 502"));
    assert!(job["LastErrorTimeUtc"].is_string());

    scheduler.update_job_data(&key, |data| {
        mark_job_successful(data, Some(json!({"rows": 7})));
    });

    let (_, body) = get_json(app, "/quartz").await;
    let job = &body["Schedulers"]["s"]["Jobs"][0];
    assert_eq!(job["LastRunSuccessful"], json!(true));
    assert_eq!(job["LastRunOutput"], json!({"rows": 7}));
}

#[tokio::test]
async fn gate_denies_and_allows_per_spec_ranges() {
    let state = ActuatorState::new().with_ip_allow_list(true);
    state
        .allow_list
        .set_from_str("192.168.0.0/16,10.0.0.0/8")
        .unwrap();
    let app = actuator_router(state);

    for (remote, expected) in [
        ("192.168.1.1:1000", StatusCode::OK),
        ("10.255.255.1:1000", StatusCode::OK),
        ("172.21.1.1:1000", StatusCode::UNAUTHORIZED),
    ] {
        let response = app
            .clone()
            .oneshot(request_from("/info", remote))
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "{remote}");
    }
}

#[tokio::test]
async fn denied_response_carries_forbidden_message() {
    let state = ActuatorState::new().with_ip_allow_list(true);
    state.allow_list.set_from_str("10.0.0.0/8").unwrap();

    let response = actuator_router(state)
        .oneshot(request_from("/health", "172.21.1.1:1000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"message": "Forbidden"}));
}

#[tokio::test]
async fn clearing_the_allowlist_reopens_every_endpoint() {
    let state = ActuatorState::new().with_ip_allow_list(true);
    state.allow_list.set_from_str("10.0.0.0/8").unwrap();
    let app = actuator_router(state.clone());

    let response = app
        .clone()
        .oneshot(request_from("/info", "172.21.1.1:1000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    state.allow_list.clear();

    let response = app
        .oneshot(request_from("/info", "172.21.1.1:1000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
