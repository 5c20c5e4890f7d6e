mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{api_error, completed_status, init_logging, ScriptedApi};
use futures_util::StreamExt;
use ga_monitor_core::JobId;
use ga_monitor_engine::{
    ApiFailureKind, CancellationController, JobLauncher, JobSession, LaunchParams, Method,
    PollingLoop, StopOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn launched(api: Arc<ScriptedApi>, session: &mut JobSession) -> ga_monitor_engine::JobHandle {
    JobLauncher::new(api)
        .launch(session, &LaunchParams::new("2024-01-01", "2024-01-07"))
        .await
        .expect("launch ok")
}

#[tokio::test]
async fn cancel_without_active_job_does_nothing() {
    init_logging();
    let api = Arc::new(ScriptedApi::new(Vec::new()));
    let controller = CancellationController::new(api.clone());
    let mut session = JobSession::new();

    assert_eq!(controller.cancel(&mut session).await, None);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn cancel_halts_job_and_sends_stop() {
    init_logging();
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(json!({ "visualizationId": "v1" })),
        Ok(Value::Null),
    ]));
    let mut session = JobSession::new();
    let handle = launched(api.clone(), &mut session).await;
    let controller = CancellationController::new(api.clone());

    let outcome = controller.cancel(&mut session).await;

    assert_eq!(
        outcome,
        Some(StopOutcome {
            job_id: JobId::new("v1"),
            acknowledged: true,
        })
    );
    assert!(handle.is_cancelled());
    assert!(session.active().is_none());

    let stop = &api.requests()[1];
    assert_eq!(stop.method, Method::Post);
    assert_eq!(stop.endpoint, "/ga/stop?visualizationId=v1");

    // Second cancel is a no-op.
    assert_eq!(controller.cancel(&mut session).await, None);
    assert_eq!(api.requests().len(), 2);
}

#[tokio::test]
async fn failed_stop_request_still_halts_locally() {
    init_logging();
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(json!({ "visualizationId": "v1" })),
        Err(api_error(ApiFailureKind::Network, "connection refused")),
    ]));
    let mut session = JobSession::new();
    let handle = launched(api.clone(), &mut session).await;

    let outcome = CancellationController::new(api)
        .cancel(&mut session)
        .await
        .expect("job was live");

    assert!(!outcome.acknowledged);
    assert!(handle.is_cancelled());
    assert!(session.active().is_none());
}

#[tokio::test]
async fn cancel_after_natural_completion_is_a_no_op() {
    init_logging();
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(json!({ "visualizationId": "v1" })),
        Ok(completed_status(3)),
    ]));
    let mut session = JobSession::new();
    let handle = launched(api.clone(), &mut session).await;

    let snapshots = PollingLoop::new(api.clone(), Duration::from_millis(5))
        .start(&handle)
        .collect::<Vec<_>>()
        .await;
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].as_ref().unwrap().completed);

    let outcome = CancellationController::new(api.clone())
        .cancel(&mut session)
        .await;

    assert_eq!(outcome, None);
    assert!(!handle.is_cancelled());
    assert!(api
        .requests()
        .iter()
        .all(|r| !r.endpoint.starts_with("/ga/stop")));
}
